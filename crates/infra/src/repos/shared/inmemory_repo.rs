use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

/// Inserts `val` unless an item matching `compare` already exists.
/// Returns whether `val` was inserted.
pub fn insert_unless<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> bool {
    let mut collection = collection.lock().unwrap();
    if collection.iter().any(compare) {
        return false;
    }
    collection.push(val.clone());
    true
}

/// Replaces the first item matching `compare` with `val`, or inserts it
pub fn upsert_by<T: Clone, F: Fn(&T) -> bool>(val: &T, collection: &Mutex<Vec<T>>, compare: F) {
    let mut collection = collection.lock().unwrap();
    match collection.iter().position(compare) {
        Some(i) => collection[i] = val.clone(),
        None => collection.push(val.clone()),
    }
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    items
}
