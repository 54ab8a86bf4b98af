//! Merge semantics across whole databases
//!
//! After `update`, the two databases must not share any state.

use xrdb::Database;

fn db(entries: &[(&str, &str)]) -> Database<String> {
    let mut db = Database::new();
    for (spec, value) in entries {
        db.insert(spec, value.to_string());
    }
    db
}

fn get(db: &Database<String>, name: &str) -> Option<String> {
    db.query(name, name).ok().cloned()
}

#[test]
fn test_update_then_mutate_source() {
    let mut d1 = db(&[("a.b", "1")]);
    let mut d2 = db(&[("a.b", "2"), ("a.c", "3")]);

    d1.update(&d2);
    assert_eq!(get(&d1, "a.b"), Some("2".to_string()));
    assert_eq!(get(&d1, "a.c"), Some("3".to_string()));

    d2.insert("a.c", "9".to_string());
    assert_eq!(get(&d1, "a.c"), Some("3".to_string()));
    assert_eq!(get(&d2, "a.c"), Some("9".to_string()));
}

#[test]
fn test_update_then_mutate_destination() {
    let mut d1 = Database::new();
    let d2 = db(&[("x*y", "orig")]);

    d1.update(&d2);
    d1.insert("x*y", "changed".to_string());
    d1.insert("x*y.z", "new".to_string());

    assert_eq!(get(&d2, "x.q.y"), Some("orig".to_string()));
    assert_eq!(get(&d2, "x.y.z"), None);
}

#[test]
fn test_update_is_idempotent() {
    let src = db(&[("a.b", "1"), ("*c", "2"), ("a*d.e", "3")]);
    let mut dest = Database::new();
    dest.update(&src);
    let once: Vec<(String, String)> = dest
        .entries()
        .into_iter()
        .map(|(s, v)| (s, v.clone()))
        .collect();

    dest.update(&src);
    let twice: Vec<(String, String)> = dest
        .entries()
        .into_iter()
        .map(|(s, v)| (s, v.clone()))
        .collect();

    assert_eq!(once, twice);
    assert_eq!(once.len(), 3);
}

#[test]
fn test_update_order_decides_conflicts() {
    let low = db(&[("app*font", "fixed"), ("app*color", "red")]);
    let high = db(&[("app*font", "6x13")]);

    let mut forward = Database::new();
    forward.update(&low);
    forward.update(&high);
    assert_eq!(get(&forward, "app.font"), Some("6x13".to_string()));
    assert_eq!(get(&forward, "app.color"), Some("red".to_string()));

    let mut reverse = Database::new();
    reverse.update(&high);
    reverse.update(&low);
    assert_eq!(get(&reverse, "app.font"), Some("fixed".to_string()));
}

#[test]
fn test_clone_is_independent() {
    let mut original = db(&[("a.b", "1")]);
    let copy = original.clone();
    original.insert("a.b", "2".to_string());

    assert_eq!(get(&copy, "a.b"), Some("1".to_string()));
}
