use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ragroute_chat::Args::parse();

	ragroute_chat::run(args).await
}
