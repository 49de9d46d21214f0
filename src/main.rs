use clap::Parser;

use zenith::args::CliInfo;

fn main() {
  env_logger::init();

  let cli = CliInfo::parse();
  match cli.cmd.handle() {
    Ok(()) => std::process::exit(0),
    Err(e) => {
      eprintln!("[zenith] {e}");
      std::process::exit(e.exit_code());
    }
  }
}
