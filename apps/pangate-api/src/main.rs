use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = pangate_api::Args::parse();
	pangate_api::run(args).await
}
