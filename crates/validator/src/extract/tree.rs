//! Nested trees from flat form keys.
//!
//! `user[name]=a`, `contact.email=b`, `tags[]=x&tags[]=y` and
//! `items[0][id]=1` become nested objects and arrays. Repeated plain keys
//! collect into an array. Objects whose keys are all indices become arrays
//! ordered by index. Leaves stay strings; coercion happens later.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Push,
}

/// Builds a tree from decoded `(key, value)` pairs.
pub(crate) fn build<I, K>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut root = Map::new();
    for (key, value) in pairs {
        let steps = parse_key(key.as_ref());
        if let Some((Step::Key(head), rest)) = steps.split_first() {
            insert(&mut root, head, rest, value);
        }
    }
    root.into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect()
}

fn parse_key(key: &str) -> Vec<Step> {
    let (head, mut rest) = match key.find('[') {
        Some(0) | None => (key, ""),
        Some(i) => key.split_at(i),
    };
    let mut steps: Vec<Step> = head
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| Step::Key(part.to_owned()))
        .collect();
    if steps.is_empty() {
        return vec![Step::Key(key.to_owned())];
    }
    while let Some(after) = rest.strip_prefix('[') {
        let Some(close) = after.find(']') else {
            // Unbalanced brackets: keep the key literal.
            return vec![Step::Key(key.to_owned())];
        };
        let inner = &after[..close];
        steps.push(if inner.is_empty() {
            Step::Push
        } else {
            Step::Key(inner.to_owned())
        });
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        return vec![Step::Key(key.to_owned())];
    }
    steps
}

fn insert(map: &mut Map<String, Value>, key: &str, rest: &[Step], value: Value) {
    match rest.split_first() {
        None => match map.get_mut(key) {
            None => {
                map.insert(key.to_owned(), value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
        },
        Some((Step::Push, tail)) => {
            let entry = map
                .entry(key.to_owned())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !entry.is_array() {
                let previous = entry.take();
                *entry = Value::Array(vec![previous]);
            }
            let Value::Array(items) = entry else {
                return;
            };
            match tail.split_first() {
                None => items.push(value),
                Some((Step::Key(child), tail)) => {
                    let mut object = Map::new();
                    insert(&mut object, child, tail, value);
                    items.push(Value::Object(object));
                }
                // `a[][]` has no sensible nesting.
                Some((Step::Push, _)) => {}
            }
        }
        Some((Step::Key(child), tail)) => {
            let entry = map
                .entry(key.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            // A scalar already sits here; the nested value is dropped.
            if let Value::Object(object) = entry {
                insert(object, child, tail, value);
            }
        }
    }
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let indexed = !map.is_empty() && map.keys().all(|key| key.parse::<usize>().is_ok());
            if indexed {
                let mut items: Vec<(usize, Value)> = map
                    .into_iter()
                    .filter_map(|(key, value)| Some((key.parse().ok()?, normalize(value))))
                    .collect();
                items.sort_by_key(|(index, _)| *index);
                Value::Array(items.into_iter().map(|(_, value)| value).collect())
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, normalize(value)))
                        .collect(),
                )
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}
