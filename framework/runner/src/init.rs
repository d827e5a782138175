use clap::Parser;

/// Initialise logging and parse the command line of a harness binary.
pub fn init<C: Parser>() -> C {
    env_logger::init();

    C::parse()
}
