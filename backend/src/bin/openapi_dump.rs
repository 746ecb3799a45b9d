//! Print the OpenAPI document as JSON for external tooling.

use backend::ApiDoc;
use color_eyre::eyre::WrapErr;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let rendered = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to render the OpenAPI document")?;
    println!("{rendered}");
    Ok(())
}
