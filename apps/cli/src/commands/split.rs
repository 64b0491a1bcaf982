//! `tabsplit split`: bill file in, who-owes-what out.

use std::path::Path;

use tabsplit_core::report::render_split;
use tabsplit_core::SplitCalculator;

use super::render;
use crate::bill_file::BillFile;
use crate::config::OutputFormat;
use crate::error::AppResult;

pub fn run(bill_path: &Path, format: OutputFormat) -> AppResult<String> {
    let bill = BillFile::load(bill_path)?.to_bill_state()?;
    let split = SplitCalculator.compute(&bill)?;
    render(format, &split, render_split)
}
