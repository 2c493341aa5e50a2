use colored::Colorize;

use crate::browser::RecordBrowser;
use crate::cli::{open_view, request_page, ViewArgs, ViewKind};
use crate::error::Result;

pub fn run(kind: ViewKind, args: &ViewArgs) -> Result<()> {
    let mut view = open_view(kind, args)?;
    let warning = request_page(&mut view, args.page);
    if let Some(ref warning) = warning {
        eprintln!("{} {warning}", "Warning:".yellow().bold());
    }
    let mut browser = RecordBrowser::new(kind.title(), view);
    if let Some(warning) = warning {
        browser.set_status(warning);
    }
    browser.run()?;
    Ok(())
}
