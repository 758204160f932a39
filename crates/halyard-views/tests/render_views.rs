//! Rendering object graphs through declared views.

use halyard_core::{Accessor, Computed, Node, Resolve};
use halyard_views::{Emittable, Field, JsonEmitter, View, ViewError};
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

struct Account {
	username: String,
	email: Option<String>,
	teams: Vec<&'static str>,
}

impl Resolve for Account {
	fn attribute(&self, name: &str) -> Option<Accessor> {
		match name {
			"username" => Some(Accessor::plain(json!(self.username))),
			"email" => Some(Accessor::plain(json!(self.email))),
			"team_count" => {
				let count = self.teams.len();
				Some(Accessor::Computed(Computed::new(move || json!(count).into())))
			}
			"teams" => Some(Accessor::plain(Node::List(
				self.teams
					.iter()
					.map(|team| Node::from(json!({ "slug": team })))
					.collect(),
			))),
			_ => None,
		}
	}

	fn item(&self, key: &str) -> Option<Node> {
		(key == "kind").then(|| json!("account").into())
	}

	fn to_value(&self) -> Value {
		json!({ "username": self.username, "email": self.email })
	}
}

fn account(username: &str, email: Option<&str>, teams: Vec<&'static str>) -> Node {
	Node::object(Account {
		username: username.to_string(),
		email: email.map(str::to_string),
		teams,
	})
}

#[fixture]
fn account_view() -> Arc<View> {
	let team = View::new("Team").field("slug").build();
	View::new("Account")
		.fields(["username", "kind"])
		.field(Field::new("email").unwrap().optional())
		.field(Field::with_destination("team_count", "teams_joined").unwrap())
		.field(Field::new("teams").unwrap().nested(team))
		.build()
}

#[rstest]
fn test_optional_none_is_omitted(account_view: Arc<View>) {
	let output = account_view
		.bind(account("ada", None, vec![]))
		.emittable()
		.unwrap();

	assert_eq!(
		output,
		json!({ "username": "ada", "kind": "account", "teams_joined": 0, "teams": [] })
	);
}

#[rstest]
fn test_required_none_is_present() {
	let view = View::new("Account").field("email").build();

	let rendered = view.render_one(account("ada", None, vec![])).unwrap();

	assert!(rendered["email"].is_null());
}

#[rstest]
fn test_dotted_path_without_destination_is_rejected() {
	let err = Field::new("profile.display_name").unwrap_err();

	assert!(matches!(err, ViewError::InvalidFieldSpec { ref name, .. } if name == "profile.display_name"));
}

#[rstest]
fn test_sequence_renders_one_mapping_per_object(account_view: Arc<View>) {
	let accounts = vec![
		account("ada", Some("ada@example.com"), vec!["core"]),
		account("grace", None, vec!["core", "docs"]),
		account("alan", None, vec![]),
	];

	let output = account_view.bind_many(accounts).emittable().unwrap();

	let Value::Array(items) = output else {
		panic!("expected an array");
	};
	assert_eq!(items.len(), 3);
	assert_eq!(items[0]["email"], json!("ada@example.com"));
	assert!(items[1].get("email").is_none());
	assert_eq!(items[1]["teams"], json!([{ "slug": "core" }, { "slug": "docs" }]));
	assert_eq!(items[2]["teams_joined"], json!(0));
}

#[rstest]
fn test_emitted_keys_follow_definition_order(account_view: Arc<View>) {
	let text = JsonEmitter::new()
		.emit(&account_view.bind(account("ada", Some("a@x"), vec!["core"])))
		.unwrap();

	assert_eq!(
		text,
		r#"{"username":"ada","kind":"account","email":"a@x","teams_joined":1,"teams":[{"slug":"core"}]}"#
	);
}

#[rstest]
fn test_failure_in_nested_view_propagates() {
	let team = View::new("Team").field("name").build();
	let view = View::new("Account")
		.field(Field::new("teams").unwrap().nested(team))
		.build();

	let err = view
		.bind(account("ada", None, vec!["core"]))
		.emittable()
		.unwrap_err();

	assert!(matches!(err, ViewError::AttributeLookupFailed { ref segment, .. } if segment == "name"));
}
