//! Brochure file naming and persistence.

use std::path::{Path, PathBuf};

use tracing::info;

use brochure_shared::{BrochureError, Result};

/// File name for a company's brochure: spaces become hyphens, `.md` appended.
pub fn brochure_file_name(company_name: &str) -> String {
    format!("{}.md", company_name.trim().replace(' ', "-"))
}

/// Write `markdown` to `<dir>/<brochure_file_name>`, replacing any existing file.
pub fn persist_brochure(dir: &Path, company_name: &str, markdown: &str) -> Result<PathBuf> {
    let file_name = brochure_file_name(company_name);
    if file_name == ".md" || file_name.contains(['/', '\\']) {
        return Err(BrochureError::validation(format!(
            "company name '{company_name}' cannot be used as a file name"
        )));
    }

    let path = dir.join(file_name);
    std::fs::write(&path, markdown).map_err(|e| BrochureError::io(&path, e))?;

    info!(path = %path.display(), bytes = markdown.len(), "brochure written");
    Ok(path)
}
