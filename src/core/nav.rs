//! # Navigation Tree
//!
//! The static two-level menu: sections at depth 0 that group leaves at depth 1,
//! plus top-level leaves that navigate directly.
//!
//! ```text
//! NavTree
//! ├── dashboard            /dashboard            (top-level leaf)
//! ├── compras              (section)
//! │   ├── pedidos-compra   /compras/pedidos
//! │   └── recebimento      /compras/recebimento
//! └── producao             (section)
//!     └── ...
//! ```
//!
//! The tree is immutable once built. Lookups never fail loudly: a malformed
//! tree still resolves in traversal order, and `validate()` reports what is
//! wrong so the binary and the test suite can flag it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A node in the navigation tree. Leaves carry a `path`, sections carry `children`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub children: Vec<NavEntry>,
}

impl NavEntry {
    pub fn leaf(id: &str, label: &str, icon: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: Some(icon.to_string()),
            path: Some(path.to_string()),
            children: Vec::new(),
        }
    }

    pub fn section(id: &str, label: &str, icon: &str, children: Vec<NavEntry>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: Some(icon.to_string()),
            path: None,
            children,
        }
    }

    /// A section is any entry with at least one child.
    pub fn is_section(&self) -> bool {
        !self.children.is_empty()
    }

    /// Glyph shown in icon-only mode. Falls back to the label's first character.
    pub fn icon_or_initial(&self) -> String {
        match &self.icon {
            Some(icon) if !icon.is_empty() => icon.clone(),
            _ => self
                .label
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_else(|| "?".to_string()),
        }
    }
}

/// A leaf found by a lookup, together with the section that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafMatch<'a> {
    pub leaf: &'a NavEntry,
    pub parent: Option<&'a NavEntry>,
}

/// The full navigation tree, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavTree {
    pub entries: Vec<NavEntry>,
}

impl NavTree {
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }

    /// Iterate over every leaf (depth 0 or 1) in traversal order.
    ///
    /// Sections contribute their children; a section that also carries a
    /// `path` is not treated as a leaf.
    pub fn leaves(&self) -> impl Iterator<Item = LeafMatch<'_>> {
        self.entries.iter().flat_map(|entry| {
            let own: Option<LeafMatch<'_>> = if entry.is_section() {
                None
            } else {
                Some(LeafMatch {
                    leaf: entry,
                    parent: None,
                })
            };
            let nested = entry
                .children
                .iter()
                .filter(|child| !child.is_section())
                .map(move |child| LeafMatch {
                    leaf: child,
                    parent: Some(entry),
                });
            own.into_iter().chain(nested)
        })
    }

    /// First leaf whose path equals `path`. Traversal order decides ties.
    pub fn find_leaf_by_path(&self, path: &str) -> Option<LeafMatch<'_>> {
        self.leaves()
            .find(|m| m.leaf.path.as_deref() == Some(path))
    }

    /// First entry (section or leaf, depth 0 or 1) with the given id.
    pub fn find(&self, id: &str) -> Option<&NavEntry> {
        self.entries.iter().find_map(|entry| {
            if entry.id == id {
                Some(entry)
            } else {
                entry.children.iter().find(|child| child.id == id)
            }
        })
    }

    /// Id of the section containing the leaf `id`, if it is nested.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.children.iter().any(|child| child.id == id))
            .map(|entry| entry.id.as_str())
    }

    pub fn sections(&self) -> impl Iterator<Item = &NavEntry> {
        self.entries.iter().filter(|e| e.is_section())
    }

    /// Structural checks that the menu data should satisfy.
    ///
    /// Nothing here is enforced at runtime; callers log the issues.
    pub fn validate(&self) -> Vec<TreeIssue> {
        let mut issues = Vec::new();
        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut seen_paths: HashSet<&str> = HashSet::new();

        for entry in &self.entries {
            check_entry(entry, 0, &mut seen_ids, &mut seen_paths, &mut issues);
        }
        issues
    }
}

fn check_entry<'a>(
    entry: &'a NavEntry,
    depth: usize,
    seen_ids: &mut HashSet<&'a str>,
    seen_paths: &mut HashSet<&'a str>,
    issues: &mut Vec<TreeIssue>,
) {
    if !seen_ids.insert(entry.id.as_str()) {
        issues.push(TreeIssue::DuplicateId(entry.id.clone()));
    }

    if entry.is_section() {
        if entry.path.is_some() {
            issues.push(TreeIssue::SectionWithPath(entry.id.clone()));
        }
        if depth >= 1 {
            issues.push(TreeIssue::TooDeep(entry.id.clone()));
            return;
        }
        for child in &entry.children {
            check_entry(child, depth + 1, seen_ids, seen_paths, issues);
        }
        return;
    }

    match entry.path.as_deref() {
        None | Some("") => issues.push(TreeIssue::LeafWithoutPath(entry.id.clone())),
        Some(path) => {
            if !seen_paths.insert(path) {
                issues.push(TreeIssue::DuplicatePath {
                    id: entry.id.clone(),
                    path: path.to_string(),
                });
            }
        }
    }
}

/// A structural problem found by [`NavTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeIssue {
    DuplicateId(String),
    LeafWithoutPath(String),
    SectionWithPath(String),
    /// A section nested inside another section.
    TooDeep(String),
    /// A later leaf shares its path with an earlier one and can never be
    /// reached by route reconciliation.
    DuplicatePath { id: String, path: String },
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeIssue::DuplicateId(id) => write!(f, "duplicate id '{id}'"),
            TreeIssue::LeafWithoutPath(id) => write!(f, "leaf '{id}' has no path"),
            TreeIssue::SectionWithPath(id) => {
                write!(f, "section '{id}' has a path of its own (ignored)")
            }
            TreeIssue::TooDeep(id) => {
                write!(f, "'{id}' is nested deeper than two levels (ignored)")
            }
            TreeIssue::DuplicatePath { id, path } => {
                write!(f, "leaf '{id}' reuses path '{path}' (unreachable by route)")
            }
        }
    }
}

/// Id used as the active entry when the starting route matches nothing.
pub const DEFAULT_FALLBACK_ID: &str = "dashboard";

/// The built-in ERP menu.
pub fn default_tree() -> NavTree {
    NavTree::new(vec![
        NavEntry::leaf("dashboard", "Dashboard", "◆", "/dashboard"),
        NavEntry::leaf("produtos", "Produtos", "▤", "/produtos/lista"),
        NavEntry::section(
            "compras",
            "Compras",
            "⇩",
            vec![
                NavEntry::leaf("pedidos-compra", "Pedidos de compra", "•", "/compras/pedidos"),
                NavEntry::leaf("recebimento", "Recebimento", "•", "/compras/recebimento"),
            ],
        ),
        NavEntry::section(
            "producao",
            "Produção",
            "⚙",
            vec![
                NavEntry::leaf(
                    "fichas-tecnicas",
                    "Fichas técnicas",
                    "•",
                    "/producao/fichas-tecnicas",
                ),
                NavEntry::leaf("ordens-producao", "Ordens de produção", "•", "/producao/ordens"),
                NavEntry::leaf("cronograma", "Cronograma", "•", "/producao/cronograma"),
            ],
        ),
        NavEntry::section(
            "vendas",
            "Vendas",
            "⇧",
            vec![
                NavEntry::leaf("pedidos-venda", "Pedidos de venda", "•", "/vendas/pedidos"),
                NavEntry::leaf("clientes", "Clientes", "•", "/vendas/clientes"),
            ],
        ),
        NavEntry::leaf("configuracoes", "Configurações", "≡", "/configuracoes"),
    ])
}
