pub mod config {
    use serde::Deserialize;
    use std::path::PathBuf;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Config {
        #[serde(default = "default_bind_address")]
        pub bind_address: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Location of the JSON file holding the todo collection.
        #[serde(default = "default_data_file")]
        pub data_file: PathBuf,
        /// Directory with the bundled single-page application.
        #[serde(default = "default_static_dir")]
        pub static_dir: PathBuf,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        /// Loads configuration from the given environment source.
        pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_bind_address() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5001
    }

    fn default_data_file() -> PathBuf {
        PathBuf::from("data").join("todos.json")
    }

    fn default_static_dir() -> PathBuf {
        PathBuf::from("dist")
    }

}

pub mod todo;
pub mod web;
