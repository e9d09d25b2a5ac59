fn main() -> anyhow::Result<()> {
    remsg::cli::run_cli()
}
