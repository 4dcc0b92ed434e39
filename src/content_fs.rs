//! Filesystem content source: markdown pages split into heading sections.
//!
//! Each file under `[content].root` matching the include globs becomes one
//! or more [`ContentBlock`]s, one per ATX heading (`#` … `######`). Text
//! before the first heading forms a preamble block titled after the file.
//!
//! Pages can declare metadata with HTML comments, which apply to the
//! section they appear in:
//!
//! ```text
//! <!-- keywords: muster, lifejacket -->
//! <!-- critical -->
//! <!-- kind: feature -->
//! ```

use anyhow::{bail, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use shipmate_core::index::ContentSource;
use shipmate_core::models::{ContentBlock, EntryType};

use crate::config::ContentConfig;

#[derive(Debug, Clone)]
pub struct MarkdownSource {
    root: PathBuf,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    follow_symlinks: bool,
}

impl MarkdownSource {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            root: config.root.clone(),
            include_globs: config.include_globs.clone(),
            exclude_globs: config.exclude_globs.clone(),
            follow_symlinks: config.follow_symlinks,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the content root and parse every matching file, in path order.
    pub fn scan(&self) -> Result<Vec<ContentBlock>> {
        if !self.root.exists() {
            bail!("Content root does not exist: {}", self.root.display());
        }

        let include_set = build_globset(&self.include_globs)?;

        let mut default_excludes = vec![
            "**/.git/**".to_string(),
            "**/target/**".to_string(),
            "**/node_modules/**".to_string(),
        ];
        default_excludes.extend(self.exclude_globs.clone());
        let exclude_set = build_globset(&default_excludes)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(self.follow_symlinks) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().replace('\\', "/");

            if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
                continue;
            }
            files.push((rel_str, path.to_path_buf()));
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut blocks = Vec::new();
        for (rel_str, path) in files {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let section_id = slugify(rel_str.rsplit_once('.').map_or(rel_str.as_str(), |(s, _)| s));
            let page_title = path
                .file_stem()
                .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
                .unwrap_or_default();
            blocks.extend(parse_markdown(&section_id, &page_title, &text));
        }

        Ok(blocks)
    }
}

#[async_trait]
impl ContentSource for MarkdownSource {
    fn name(&self) -> &str {
        "markdown"
    }

    async fn extract(&self) -> Result<Vec<ContentBlock>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.scan()).await?
    }
}

#[derive(Default)]
struct Pending {
    heading: Option<String>,
    lines: Vec<String>,
    hints: Vec<String>,
    critical: bool,
    kind: Option<EntryType>,
}

/// Split one markdown page into blocks.
///
/// Block ids are `{section_id}` for the preamble and
/// `{section_id}-{heading-slug}` for headed sections.
pub fn parse_markdown(section_id: &str, page_title: &str, text: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut current = Pending::default();
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }

        if !in_fence {
            if let Some(heading) = parse_heading(trimmed) {
                flush(&mut blocks, std::mem::take(&mut current), section_id, page_title);
                current.heading = Some(heading);
                continue;
            }

            if let Some(directive) = trimmed
                .strip_prefix("<!--")
                .and_then(|rest| rest.strip_suffix("-->"))
            {
                apply_directive(&mut current, directive.trim());
                continue;
            }
        }

        current.lines.push(trimmed.to_string());
    }
    flush(&mut blocks, current, section_id, page_title);
    blocks
}

fn parse_heading(line: &str) -> Option<String> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let heading = rest.trim().trim_end_matches('#').trim();
    if heading.is_empty() {
        None
    } else {
        Some(heading.to_string())
    }
}

fn apply_directive(block: &mut Pending, directive: &str) {
    let lowered = directive.to_lowercase();
    if let Some(list) = lowered.strip_prefix("keywords:") {
        block.hints.extend(
            list.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        );
    } else if lowered == "critical" {
        block.critical = true;
    } else if let Some(kind) = lowered.strip_prefix("kind:") {
        match kind.parse::<EntryType>() {
            Ok(kind) => block.kind = Some(kind),
            Err(e) => tracing::warn!(error = %e, "ignoring kind directive"),
        }
    }
}

fn flush(blocks: &mut Vec<ContentBlock>, pending: Pending, section_id: &str, page_title: &str) {
    let raw_text = pending.lines.join("\n").trim().to_string();
    let (id, title) = match &pending.heading {
        Some(h) => (format!("{}-{}", section_id, slugify(h)), h.clone()),
        None => {
            if raw_text.is_empty() && pending.hints.is_empty() {
                return;
            }
            (section_id.to_string(), page_title.to_string())
        }
    };
    blocks.push(ContentBlock {
        id,
        title,
        raw_text,
        section_id: section_id.to_string(),
        keyword_hints: pending.hints,
        critical: pending.critical,
        kind: pending.kind,
    });
}

/// Lowercase, alphanumerics kept, everything else collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Day 3: Cozumel!"), "day-3-cozumel");
        assert_eq!(slugify("ports/costa_maya"), "ports-costa-maya");
        assert_eq!(slugify("--"), "");
    }

    #[test]
    fn test_heading_detection() {
        assert_eq!(parse_heading("## Muster Drill"), Some("Muster Drill".to_string()));
        assert_eq!(parse_heading("# Title #"), Some("Title".to_string()));
        assert_eq!(parse_heading("#hashtag"), None);
        assert_eq!(parse_heading("####### too deep"), None);
        assert_eq!(parse_heading("plain"), None);
    }

    #[test]
    fn test_sections_and_directives() {
        let md = "Welcome aboard.\n\n\
                  ## Safety Briefing\n\
                  <!-- keywords: Muster, lifejacket -->\n\
                  <!-- critical -->\n\
                  Report to station F6.\n\n\
                  ## Spa\n\
                  <!-- kind: service -->\n\
                  Book treatments early.\n";
        let blocks = parse_markdown("guide", "guide", md);
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].id, "guide");
        assert_eq!(blocks[0].title, "guide");
        assert_eq!(blocks[0].raw_text, "Welcome aboard.");

        assert_eq!(blocks[1].id, "guide-safety-briefing");
        assert_eq!(blocks[1].title, "Safety Briefing");
        assert_eq!(blocks[1].keyword_hints, vec!["muster", "lifejacket"]);
        assert!(blocks[1].critical);
        assert_eq!(blocks[1].raw_text, "Report to station F6.");

        assert_eq!(blocks[2].kind, Some(EntryType::Service));
        assert!(!blocks[2].critical);
        assert_eq!(blocks[2].section_id, "guide");
    }

    #[test]
    fn test_fenced_code_is_not_a_heading() {
        let md = "## Wifi\n```\n# not a heading\n```\nConnect to the portal.";
        let blocks = parse_markdown("wifi", "wifi", md);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].raw_text.contains("# not a heading"));
    }

    #[test]
    fn test_empty_preamble_skipped() {
        let blocks = parse_markdown("p", "p", "\n\n# Only Heading\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "p-only-heading");
        assert_eq!(blocks[0].raw_text, "");
    }
}
