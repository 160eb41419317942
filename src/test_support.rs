//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::BTreeSet;

use crate::core::nav::{NavEntry, NavTree};

/// Small purchasing menu: one top-level leaf before and after a two-item section.
pub fn sample_tree() -> NavTree {
    NavTree::new(vec![
        NavEntry::leaf("dashboard", "Dashboard", "◆", "/dashboard"),
        NavEntry::section(
            "compras",
            "Compras",
            "⇩",
            vec![
                NavEntry::leaf("pedidos-compra", "Pedidos de compra", "•", "/compras/pedidos"),
                NavEntry::leaf("recebimento", "Recebimento", "•", "/compras/recebimento"),
            ],
        ),
        NavEntry::leaf("produtos", "Produtos", "▤", "/produtos/lista"),
    ])
}

pub fn set_of(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
