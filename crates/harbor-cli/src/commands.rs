//! Main commands enum.
//!
//! Every command takes an optional trailing environment; without it the
//! invocation's default environment is used.

use clap::Subcommand;

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Render the configuration and start the server
    Server {
        /// Environment to start
        environment: Option<String>,
    },

    /// Render the configuration and reload the server if it is running
    Build {
        /// Environment to build
        environment: Option<String>,
    },

    /// Ask the running server to reload its configuration
    Hup {
        /// Environment whose server to reload
        environment: Option<String>,
    },

    /// Ask the running server to shut down
    Term {
        /// Environment whose server to stop
        environment: Option<String>,
    },

    /// Send any signal to the running server
    Signal {
        /// Signal name (USR1, SIGUSR1) or number
        name: String,
        /// Environment whose server to signal
        environment: Option<String>,
    },

    /// Run code inside the server and print its output
    Exec {
        /// Code to run
        code: String,
        /// Environment to run in
        environment: Option<String>,
    },

    /// Apply pending migrations inside the server
    Migrate {
        /// Environment to migrate
        environment: Option<String>,
    },

    /// Show resolved project paths
    Paths {
        /// Environment whose paths to show
        environment: Option<String>,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

/// A parsed command, reduced to what the registry dispatches on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Registered command name.
    pub name: String,
    /// The command's positional argument (signal name, code), if any.
    pub argument: Option<String>,
    /// Explicit environment, if given.
    pub environment: Option<String>,
}

impl Invocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }
}

impl From<Commands> for Invocation {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Server { environment } => Self::new("server").with_environment(environment),
            Commands::Build { environment } => Self::new("build").with_environment(environment),
            Commands::Hup { environment } => Self::new("hup").with_environment(environment),
            Commands::Term { environment } => Self::new("term").with_environment(environment),
            Commands::Signal { name, environment } => Self::new("signal")
                .with_argument(name)
                .with_environment(environment),
            Commands::Exec { code, environment } => Self::new("exec")
                .with_argument(code)
                .with_environment(environment),
            Commands::Migrate { environment } => Self::new("migrate").with_environment(environment),
            Commands::Paths { environment } => Self::new("paths").with_environment(environment),
            Commands::External(args) => {
                let mut args = args.into_iter();
                let mut invocation = Self::new(args.next().unwrap_or_default());
                invocation.argument = args.next();
                invocation
            }
        }
    }
}
