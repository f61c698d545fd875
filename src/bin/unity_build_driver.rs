//! unity_build_driver - runs inside the builder container.
//!
//! Receives the engine-style argument vector (`-projectPath`, `-buildTarget`,
//! `-customBuildPath`, `-customBuildName`, ...), drives one player build
//! through the engine named by `UNITY_BUILD_ENGINE` and exits with a code
//! describing the outcome.

use std::process;
use unity_builder::driver::{BuildDriver, ProcessEngine};
use unity_builder::env::ProcessEnv;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = ProcessEngine::from_env(&ProcessEnv);
    let mut driver = BuildDriver::new(engine, ProcessEnv);

    process::exit(driver.run(std::env::args()));
}
