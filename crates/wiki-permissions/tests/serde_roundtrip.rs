//! Serialized policy and permission forms.

use wiki_permissions::{Permission, PermissionSet};

#[test]
fn test_permission_serializes_canonical_actions() {
    let p = Permission::new("Main*", "VIEW,edit").unwrap();
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "target": "Main*", "actions": "edit,view" })
    );
}

#[test]
fn test_permission_deserialize_runs_validation() {
    let ok: Permission =
        serde_json::from_str(r#"{"target": "*Main", "actions": "upload"}"#).unwrap();
    assert_eq!(ok, Permission::new("*Main", "upload").unwrap());

    let bad = serde_json::from_str::<Permission>(r#"{"target": "Main", "actions": "fly"}"#);
    assert!(bad.unwrap_err().to_string().contains("Unrecognized action"));

    let blank = serde_json::from_str::<Permission>(r#"{"target": "Main", "actions": ""}"#);
    assert!(blank.is_err());
}

#[test]
fn test_permission_set_serializes_as_list() {
    let set = PermissionSet::from_grants(&[("*", "view"), ("Main", "delete")]).unwrap();
    let json = serde_json::to_string(&set).unwrap();
    let back: PermissionSet = serde_json::from_str(&json).unwrap();
    assert_eq!(set, back);
    assert!(!back.implies(&Permission::new("Main", "rename").unwrap()));
    assert!(back.implies(&Permission::new("Main", "upload").unwrap()));
}
