use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn create(name: String, parent_id: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// `parent_id` of `Some(None)` detaches the category.
    pub fn update(self, name: Option<String>, parent_id: Option<Option<i64>>) -> Self {
        Self {
            name: name.unwrap_or(self.name),
            parent_id: parent_id.unwrap_or(self.parent_id),
            updated_at: Utc::now(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub depth: usize,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

/// Flattened tree entry for parent pickers, e.g. `---- Shoes` at depth 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    pub id: i64,
    pub label: String,
}

/// True when `parent_id` is `id` itself or one of its descendants.
pub fn would_create_cycle(categories: &[Category], id: i64, parent_id: i64) -> bool {
    let parents: HashMap<i64, Option<i64>> =
        categories.iter().map(|c| (c.id, c.parent_id)).collect();
    let mut seen = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(cursor) = current {
        if cursor == id {
            return true;
        }
        if !seen.insert(cursor) {
            return false;
        }
        current = parents.get(&cursor).copied().flatten();
    }
    false
}

/// Forest of the given categories. Children are ordered by name.
///
/// A category whose parent is absent from the slice is a root. Categories
/// that cannot be reached from any root (a parent cycle) are appended as
/// extra roots so every category appears exactly once.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let known: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    let mut children: BTreeMap<Option<i64>, Vec<&Category>> = BTreeMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(category);
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
    }

    let mut visited = HashSet::new();
    let mut roots: Vec<CategoryNode> = children
        .get(&None)
        .map(|top| {
            top.iter()
                .map(|c| grow(c, 0, &children, &mut visited))
                .collect()
        })
        .unwrap_or_default();

    let mut stranded: Vec<&Category> = categories
        .iter()
        .filter(|c| !visited.contains(&c.id))
        .collect();
    stranded.sort_by_key(|c| c.id);
    for category in stranded {
        if !visited.contains(&category.id) {
            roots.push(grow(category, 0, &children, &mut visited));
        }
    }
    roots
}

fn grow(
    category: &Category,
    depth: usize,
    children: &BTreeMap<Option<i64>, Vec<&Category>>,
    visited: &mut HashSet<i64>,
) -> CategoryNode {
    visited.insert(category.id);
    let kids = children.get(&Some(category.id)).cloned().unwrap_or_default();
    let mut nodes = Vec::with_capacity(kids.len());
    for kid in kids {
        if !visited.contains(&kid.id) {
            nodes.push(grow(kid, depth + 1, children, visited));
        }
    }
    CategoryNode {
        id: category.id,
        name: category.name.clone(),
        parent_id: category.parent_id,
        depth,
        children: nodes,
    }
}

/// Preorder walk of the tree with `--` per depth level before the name.
pub fn hierarchy_options(tree: &[CategoryNode]) -> Vec<CategoryOption> {
    let mut options = Vec::new();
    let mut stack: Vec<&CategoryNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        let label = if node.depth == 0 {
            node.name.clone()
        } else {
            format!("{} {}", "--".repeat(node.depth), node.name)
        };
        options.push(CategoryOption { id: node.id, label });
        stack.extend(node.children.iter().rev());
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, parent_id: Option<i64>) -> Category {
        Category {
            id,
            ..Category::create(name.into(), parent_id)
        }
    }

    fn sample() -> Vec<Category> {
        vec![
            category(1, "Clothing", None),
            category(2, "shoes", Some(1)),
            category(3, "Accessories", Some(1)),
            category(4, "Boots", Some(2)),
            category(5, "Books", None),
        ]
    }

    #[test]
    fn tree_nests_and_orders_children_by_name() {
        let tree = build_tree(&sample());
        let roots: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["Books", "Clothing"]);

        let clothing = &tree[1];
        let kids: Vec<&str> = clothing.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(kids, vec!["Accessories", "shoes"]);
        assert_eq!(clothing.children[1].children[0].name, "Boots");
        assert_eq!(clothing.children[1].children[0].depth, 2);
    }

    #[test]
    fn hierarchy_labels_follow_depth() {
        let options = hierarchy_options(&build_tree(&sample()));
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Books", "Clothing", "-- Accessories", "-- shoes", "---- Boots"]
        );
    }

    #[test]
    fn missing_parent_makes_a_root_and_cycles_are_not_lost() {
        let categories = vec![
            category(1, "Orphan", Some(99)),
            category(2, "Loop A", Some(3)),
            category(3, "Loop B", Some(2)),
        ];
        let tree = build_tree(&categories);
        assert_eq!(tree[0].name, "Orphan");
        assert_eq!(tree[0].depth, 0);
        let ids: Vec<i64> = hierarchy_options(&tree).iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&2) && ids.contains(&3));
    }

    #[test]
    fn cycle_detection_walks_ancestors() {
        let categories = sample();
        assert!(would_create_cycle(&categories, 1, 1));
        assert!(would_create_cycle(&categories, 1, 4));
        assert!(would_create_cycle(&categories, 2, 4));
        assert!(!would_create_cycle(&categories, 4, 3));
        assert!(!would_create_cycle(&categories, 5, 2));
    }

    #[test]
    fn update_can_detach_from_parent() {
        let child = category(2, "Shoes", Some(1));
        let kept = child.clone().update(Some("Sneakers".into()), None);
        assert_eq!(kept.parent_id, Some(1));
        assert_eq!(kept.name, "Sneakers");
        let detached = child.update(None, Some(None));
        assert_eq!(detached.parent_id, None);
    }
}
