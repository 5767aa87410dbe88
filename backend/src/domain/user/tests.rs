//! Tests for the roster model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn ada() -> User {
    User::try_from_strings("u1", "Ada Lovelace", "ada@example.com").expect("fixture user")
}

#[rstest]
fn trims_name_and_email() {
    let user = User::try_from_strings("u1", "  Ada  ", " ada@example.com ").expect("valid");
    assert_eq!(user.name().as_ref(), "Ada");
    assert_eq!(user.email().as_ref(), "ada@example.com");
}

#[rstest]
#[case("   ".to_owned(), UserValidationError::EmptyName)]
#[case("n".repeat(USER_NAME_MAX + 1), UserValidationError::NameTooLong { max: USER_NAME_MAX })]
fn rejects_bad_names(#[case] name: String, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(name), Err(expected));
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("ada.example.com", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("ada@", UserValidationError::InvalidEmail)]
#[case("ada@ex@ample.com", UserValidationError::InvalidEmail)]
#[case("ada lovelace@example.com", UserValidationError::InvalidEmail)]
fn rejects_bad_emails(#[case] email: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(email), Err(expected));
}

#[rstest]
fn rejects_empty_id() {
    let result = User::try_from_strings("", "Ada", "ada@example.com");
    assert_eq!(
        result,
        Err(UserValidationError::InvalidId(RecordIdValidationError::Empty))
    );
}

#[rstest]
fn serialises_as_flat_camel_case(ada: User) {
    let value = serde_json::to_value(&ada).expect("serialise");
    assert_eq!(
        value,
        json!({ "id": "u1", "name": "Ada Lovelace", "email": "ada@example.com" })
    );
}

#[rstest]
fn deserialising_validates_fields() {
    let result: Result<User, _> =
        serde_json::from_value(json!({ "id": "u1", "name": "", "email": "ada@example.com" }));
    assert!(result.is_err());
}

#[rstest]
fn patch_changes_only_present_fields(ada: User) {
    let patch = UserPatch::try_from_options(None, Some("countess@example.com".into()))
        .expect("valid patch");
    let updated = patch.apply(&ada);
    assert_eq!(updated.id(), ada.id());
    assert_eq!(updated.name(), ada.name());
    assert_eq!(updated.email().as_ref(), "countess@example.com");
}

#[rstest]
fn empty_patch_is_rejected() {
    assert_eq!(
        UserPatch::try_from_options(None, None),
        Err(UserValidationError::EmptyPatch)
    );
}

#[rstest]
fn new_user_takes_the_store_id() {
    let draft = NewUser::try_from_strings("Grace", "grace@example.com").expect("valid");
    let user = draft.with_id(UserId::new("g9").expect("id"));
    assert_eq!(user.id().as_str(), "g9");
}
