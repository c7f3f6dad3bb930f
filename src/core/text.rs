use crate::core::Node;

/* =============================== Tree text ================================= */

/// Renders a snapshot as a unicode tree. The first line is the root name with
/// a trailing `/`; directories below it are suffixed with `/` as well.
#[must_use]
pub fn render_tree_text(root: &Node) -> String {
    fn render(node: &Node, prefix: &mut String, out: &mut String) {
        let len = node.children.len();
        for (idx, child) in node.children.iter().enumerate() {
            let last = idx + 1 == len;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&child.name);
            if child.is_dir() {
                out.push('/');
            }
            out.push('\n');

            if child.is_dir() && !child.children.is_empty() {
                let saved = prefix.len();
                prefix.push_str(if last { "    " } else { "│   " });
                render(child, prefix, out);
                prefix.truncate(saved);
            }
        }
    }

    let mut out = String::new();
    out.push_str(&root.name);
    out.push_str("/\n");
    let mut prefix = String::new();
    render(root, &mut prefix, &mut out);
    out
}

/* ============================ Token counting =============================== */

#[cfg(feature = "tokens")]
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    use std::sync::OnceLock;
    use tiktoken_rs::{CoreBPE, o200k_base};
    static BPE: OnceLock<Option<CoreBPE>> = OnceLock::new();
    match BPE.get_or_init(|| o200k_base().ok()) {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => count_words(text),
    }
}

#[cfg(not(feature = "tokens"))]
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    count_words(text)
}

#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
