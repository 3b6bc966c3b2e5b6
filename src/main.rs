use declcheck::cli::{Args, Command};
use std::process;

fn main() {
    let args = Args::parse_args();
    let command = Command::from_args(args);
    process::exit(command.run());
}
