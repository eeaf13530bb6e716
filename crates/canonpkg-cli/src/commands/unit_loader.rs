use std::fs;
use std::io::{self, Read};
use std::path::Path;

use canonpkg_lib::SourceFile;

pub fn load_unit(file: Option<&Path>, text: Option<&str>) -> Result<SourceFile, String> {
    if let Some(text) = text {
        return Ok(SourceFile::new("<inline>", text));
    }

    if let Some(path) = file {
        if path.as_os_str() == "-" {
            return load_stdin();
        }
        return load_file(path);
    }

    Err("source is required: use a positional FILE or -e/--source".to_string())
}

fn load_stdin() -> Result<SourceFile, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(SourceFile::new("<stdin>", buf))
}

fn load_file(path: &Path) -> Result<SourceFile, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(SourceFile::new(path.to_string_lossy(), content))
}
