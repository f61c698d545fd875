//! # Unity Builder
//!
//! Build Unity projects inside a Docker container.
//!
//! The host side resolves action inputs into a [`BuildSpecification`],
//! builds a builder image on top of the matching engine image and runs it
//! with the workspace mounted. Inside the container the
//! [`BuildDriver`](driver::BuildDriver) validates the engine arguments,
//! applies Android player settings, runs the build and exits with a code
//! describing the result.
//!
//! ## Usage
//!
//! ```bash
//! unity_builder --target-platform WebGL --unity-version 2019.2.11f1
//! INPUT_TARGETPLATFORM=Android unity_builder --workspace "$PWD"
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod build_parameters;
pub mod cli;
pub mod docker;
pub mod driver;
pub mod env;
pub mod error;
pub mod input;
pub mod platform;

pub use build_parameters::{ArtifactName, BuildSpecification};
pub use cli::Args;
pub use docker::ImageTag;
pub use driver::{BuildDriver, BuildResult, BuildSummary, Engine, ProcessEngine};
pub use env::{Environment, ProcessEnv, Secret};
pub use error::{BuilderError, CliError, DockerError, DriverError, Result};
pub use input::{ActionInputs, Input, InputSource};
pub use platform::TargetPlatform;
