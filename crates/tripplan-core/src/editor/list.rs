//! Positional list transitions shared by days, schedules and outings.
//!
//! Every function takes the current list by reference and returns the next
//! one. Out-of-range indices leave the list unchanged.

pub fn append<T: Clone>(list: &[T], entry: T) -> Vec<T> {
    let mut next = list.to_vec();
    next.push(entry);
    next
}

/// Remove the entry at `index`; later entries shift down by one.
pub fn remove<T: Clone>(list: &[T], index: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if index < next.len() {
        next.remove(index);
    }
    next
}

/// Swap with the previous entry. No-op at index 0.
pub fn move_up<T: Clone>(list: &[T], index: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if index > 0 && index < next.len() {
        next.swap(index - 1, index);
    }
    next
}

/// Swap with the next entry. No-op at the last index.
pub fn move_down<T: Clone>(list: &[T], index: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if index + 1 < next.len() {
        next.swap(index, index + 1);
    }
    next
}

/// Drag-and-drop move: remove at `from`, insert at `to`.
///
/// Entries between the two positions shift by one toward `from`.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if from < next.len() && to < next.len() && from != to {
        let entry = next.remove(from);
        next.insert(to, entry);
    }
    next
}

/// Replace the entry at `index` with `f` applied to it.
pub fn update<T: Clone>(list: &[T], index: usize, f: impl FnOnce(&mut T)) -> Vec<T> {
    let mut next = list.to_vec();
    if let Some(entry) = next.get_mut(index) {
        f(entry);
    }
    next
}
