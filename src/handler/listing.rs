//! # Listado de Directorios
//! src/handler/listing.rs

use crate::http::html;
use std::fs;
use std::io;
use std::path::Path;

/// Renderiza los hijos inmediatos de `dir` como una página HTML.
///
/// Cada enlace usa el path relativo al root (espacios como `%20`); los
/// directorios llevan `/` al final.
pub fn render(root: &Path, dir: &Path) -> io::Result<String> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.path().is_dir()));
    }
    entries.sort();

    let base = href_base(root, dir);

    let mut items = String::new();
    for (name, is_dir) in &entries {
        let suffix = if *is_dir { "/" } else { "" };
        let href = format!("{}{}{}", base, name, suffix).replace(' ', "%20");
        items.push_str(&format!(
            "<li><a href=\"{}\">{}{}</a></li>\n",
            html::escape(&href),
            html::escape(name),
            suffix
        ));
    }

    let title = format!("Index of {}", base);
    let body = format!(
        "<h2>{}</h2>\n<ul>\n{}</ul>\n{}",
        html::escape(&title),
        items,
        html::footer()
    );

    Ok(html::page(&title, &body))
}

/// `/` + path de `dir` relativo al root + `/`
fn href_base(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(Path::new(""));
    let mut base = String::from("/");
    for component in relative.components() {
        base.push_str(&component.as_os_str().to_string_lossy());
        base.push('/');
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn test_listing_sorted_with_trailing_slash() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.child("b.txt"), "b").unwrap();
        fs::write(dir.child("a.txt"), "a").unwrap();
        fs::create_dir(dir.child("sub")).unwrap();

        let page = render(dir.path(), dir.path()).unwrap();

        let a = page.find("href=\"/a.txt\"").unwrap();
        let b = page.find("href=\"/b.txt\"").unwrap();
        let sub = page.find("href=\"/sub/\"").unwrap();
        assert!(a < b && b < sub);
        assert!(page.contains(">sub/</a>"));
        assert!(page.contains("Index of /"));
    }

    #[test]
    fn test_listing_nested_relative_hrefs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.child("docs/my dir")).unwrap();
        fs::write(dir.child("docs/my file.txt"), "x").unwrap();

        let page = render(dir.path(), &dir.child("docs")).unwrap();

        assert!(page.contains("href=\"/docs/my%20file.txt\""));
        assert!(page.contains("href=\"/docs/my%20dir/\""));
        assert!(page.contains(">my file.txt</a>"));
        assert!(page.contains("Index of /docs/"));
    }

    #[test]
    fn test_listing_escapes_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.child("<b>.txt"), "x").unwrap();

        let page = render(dir.path(), dir.path()).unwrap();

        assert!(page.contains("&lt;b&gt;.txt"));
        assert!(!page.contains("<b>.txt"));
    }

    #[test]
    fn test_listing_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(render(dir.path(), &dir.child("nope")).is_err());
    }
}
