use kedrogen::{
    cli::{get_args, run},
    error::default_error_handler,
};
use std::io::Write;

fn main() {
    let args = get_args();

    if args.wants_version() {
        println!("kedrogen version: {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    if let Err(err) = run(&args) {
        default_error_handler(err);
    }
}
