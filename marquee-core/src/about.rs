/// Static metadata shown in a plugin's about dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    /// Empty when the plugin has no homepage.
    pub website: &'static str,
    /// Colon separated, the format cargo uses for `CARGO_PKG_AUTHORS`.
    pub authors: &'static str,
    pub icon: &'static str,
    pub credits: &'static [&'static str],
}

impl AboutInfo {
    pub fn authors(&self) -> Vec<&'static str> {
        self.authors
            .split(':')
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .collect()
    }

    pub fn website(&self) -> Option<&'static str> {
        Some(self.website).filter(|site| !site.is_empty())
    }
}
