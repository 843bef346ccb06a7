mod cli;

use cli::commands::Command;
use cli::Twenty48;
use structopt::StructOpt;

fn main() {
    env_logger::init();

    #[cfg(feature = "instrumentation")]
    twenty48::instrumentation::init_tracing();

    Twenty48::from_args().execute();

    #[cfg(feature = "instrumentation")]
    twenty48::instrumentation::print_timing_statistics();
}
