use crate::element::Element;

/// Tab navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

/// Collect all tabbable element IDs in tree order.
pub fn collect_tabbable(element: &Element) -> Vec<String> {
    let mut result = Vec::new();
    collect_tabbable_recursive(element, &mut result);
    result
}

fn collect_tabbable_recursive(element: &Element, result: &mut Vec<String>) {
    if element.is_tabbable() {
        result.push(element.id.clone());
    }
    for child in element.content.children() {
        collect_tabbable_recursive(child, result);
    }
}

/// First tabbable element in tree order, the root included.
pub fn first_tabbable(element: &Element) -> Option<&Element> {
    if element.is_tabbable() {
        return Some(element);
    }
    element.content.children().iter().find_map(first_tabbable)
}

/// Next tabbable element inside `scope`, wrapping at either end.
///
/// When `current` is outside the scope (or None), Forward lands on the first
/// element and Backward on the last. Returns None for a scope with nothing
/// to focus.
pub fn cycle_tabbable(scope: &Element, current: Option<&str>, direction: TabDirection) -> Option<String> {
    let tabbable = collect_tabbable(scope);
    if tabbable.is_empty() {
        return None;
    }

    let last = tabbable.len() - 1;
    let idx = current.and_then(|current| tabbable.iter().position(|id| id == current));
    let next = match (direction, idx) {
        (TabDirection::Forward, Some(i)) => (i + 1) % tabbable.len(),
        (TabDirection::Forward, None) => 0,
        (TabDirection::Backward, Some(0)) => last,
        (TabDirection::Backward, Some(i)) => i - 1,
        (TabDirection::Backward, None) => last,
    };

    log::trace!("[focus] cycle {:?} from {:?} -> {}", direction, current, tabbable[next]);
    Some(tabbable[next].clone())
}
