use urlpack_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_check, run_fetch};
use urlpack_lib::error::UrlPackError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), UrlPackError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Fetch(params) => run_fetch(params).await?,
        ResolvedCommand::Check(params) => run_check(params).await?,
    }

    Ok(())
}
