fn main() -> anyhow::Result<()> {
    arachnet::cli::run_cli()
}
