use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ragroute_api::Args::parse();

	ragroute_api::run(args).await
}
