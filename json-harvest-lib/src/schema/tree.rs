use super::{ConfigNode, Element, parse_element_spec};

/// Build an element tree mirroring the shape of a configuration tree.
///
/// Every node is parsed with [`parse_element_spec`]; nodes with children become nested
/// elements whose children are built the same way, in order.
#[must_use]
pub fn build_element_tree(node: &ConfigNode) -> Element {
    let elem = parse_element_spec(node.spec());

    if node.children.is_empty() {
        return elem;
    }

    let children = node.children.iter().map(build_element_tree).collect();
    elem.with_children(children)
}

/// Visit every element of a tree, parents before children.
pub fn walk<'a>(elem: &'a Element, visit: &mut impl FnMut(&'a Element)) {
    visit(elem);
    for child in elem.children() {
        walk(child, visit);
    }
}

/// Render a tree as indented lines, one element per line.
#[must_use]
pub fn dump(elem: &Element) -> String {
    let mut out = String::new();
    dump_into(elem, 0, &mut out);
    out
}

fn dump_into(elem: &Element, depth: usize, out: &mut String) {
    use core::fmt::Write;

    let _ = writeln!(out, "{:indent$}{elem}", "", indent = depth * 2);
    for child in elem.children() {
        dump_into(child, depth + 1, out);
    }
}
