use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Flags read from rc files or the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub case_sensitive: bool,
    pub no_verify_links: bool,
    pub no_local_search: bool,
    pub no_tagged_toc: bool,
    pub width: Option<u16>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans are OR-ed, options from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            case_sensitive: self.case_sensitive || other.case_sensitive,
            no_verify_links: self.no_verify_links || other.no_verify_links,
            no_local_search: self.no_local_search || other.no_local_search,
            no_tagged_toc: self.no_tagged_toc || other.no_tagged_toc,
            width: other.width.or(self.width),
        }
    }
}

/// Runtime settings consumed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Search without case folding
    pub case_sensitive: bool,
    /// Only link manual page references that exist in the index
    pub verify_links: bool,
    /// Link option tokens to their definitions
    pub local_search: bool,
    /// Include tagged paragraphs in the table of contents
    pub tagged_toc: bool,
    /// Formatting width; the viewport width when unset
    pub width: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            verify_links: true,
            local_search: true,
            tagged_toc: true,
            width: None,
        }
    }
}

impl From<&ConfigFlags> for Config {
    fn from(flags: &ConfigFlags) -> Self {
        Self {
            case_sensitive: flags.case_sensitive,
            verify_links: !flags.no_verify_links,
            local_search: !flags.no_local_search,
            tagged_toc: !flags.no_tagged_toc,
            width: flags.width,
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("manless").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("manless")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("manless").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("manless").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".manlessrc")
}

/// Read an rc file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`Error::Config`] when the file cannot be read or holds an
/// unknown flag or a bad value.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    let flags = parse_tokens(&tokens, true)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), ?flags, "loaded config");
    Ok(flags)
}

/// Global rc file, then the local override.
///
/// # Errors
///
/// Propagates [`load_config_flags`] failures.
pub fn load_default_flags() -> Result<ConfigFlags> {
    let global = load_config_flags(&global_config_path())?;
    let local = load_config_flags(&local_override_path())?;
    Ok(global.union(&local))
}

/// Pick known flags out of command-line tokens, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    // lenient mode never fails
    parse_tokens(tokens, false).unwrap_or_default()
}

fn parse_tokens(tokens: &[String], strict: bool) -> std::result::Result<ConfigFlags, String> {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--case-sensitive" => flags.case_sensitive = true,
            "--no-verify-links" => flags.no_verify_links = true,
            "--no-local-search" => flags.no_local_search = true,
            "--no-tagged-toc" => flags.no_tagged_toc = true,
            "--width" => {
                let value = tokens.get(i + 1).map(String::as_str);
                match value.map(parse_width) {
                    Some(Ok(width)) => {
                        flags.width = Some(width);
                        i += 1;
                    }
                    Some(Err(e)) if strict => return Err(e),
                    None if strict => return Err("--width needs a value".into()),
                    _ => {}
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--width=") {
                    match parse_width(value) {
                        Ok(width) => flags.width = Some(width),
                        Err(e) if strict => return Err(e),
                        Err(_) => {}
                    }
                } else if strict {
                    return Err(format!("unknown flag {token:?}"));
                }
            }
        }
        i += 1;
    }
    Ok(flags)
}

fn parse_width(s: &str) -> std::result::Result<u16, String> {
    match s.parse::<u16>() {
        Ok(width) if width > 0 => Ok(width),
        _ => Err(format!("invalid width {s:?}")),
    }
}
