//! Integration tests for `TeamRepository`
//!
//! Reads degrade to empty or default values when the database fails; the
//! settings write reports its error.

use std::rc::Rc;

use huddle_pages::backend::{
	BackendError, Table, TeamMembership, TeamRepository, UserSettings, team_settings_view,
};
use huddle_pages::testing::MockTableClient;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn client() -> Rc<MockTableClient> {
	Rc::new(
		MockTableClient::new()
			.with_rows(
				Table::Profiles,
				[json!({"id": "u-1", "full_name": "Pat Coach", "avatar_url": null})],
			)
			.with_rows(
				Table::TeamSettings,
				[json!({"team_id": "t-1", "team_name": "Otters", "sport": "Water polo", "primary_color": "#0a7ea4"})],
			)
			.with_rows(
				Table::TeamMemberships,
				[
					json!({"team_id": "t-1", "user_id": "u-1", "role": "coach"}),
					json!({"team_id": "t-2", "user_id": "u-1", "role": "player"}),
					json!({"team_id": "t-1", "user_id": "u-2", "role": "player"}),
				],
			),
	)
}

#[rstest]
#[tokio::test]
async fn test_reads(client: Rc<MockTableClient>) {
	let repo = TeamRepository::new(client);

	let profile = repo.profile("u-1").await.unwrap();
	assert_eq!(profile.full_name.as_deref(), Some("Pat Coach"));

	let team = repo.team_settings("t-1").await.unwrap();
	assert_eq!(team.primary_color.as_deref(), Some("#0a7ea4"));

	let memberships = repo.memberships("u-1").await;
	assert_eq!(
		memberships,
		vec![
			TeamMembership {
				team_id: "t-1".into(),
				user_id: "u-1".into(),
				role: "coach".into()
			},
			TeamMembership {
				team_id: "t-2".into(),
				user_id: "u-1".into(),
				role: "player".into()
			},
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_reads_degrade_on_failure(client: Rc<MockTableClient>) {
	client.set_failing(true);
	let repo = TeamRepository::new(Rc::clone(&client));

	assert!(repo.profile("u-1").await.is_none());
	assert!(repo.team_settings("t-1").await.is_none());
	assert!(repo.memberships("u-1").await.is_empty());
	assert_eq!(repo.user_settings("u-1").await, UserSettings::for_user("u-1"));
	assert_eq!(client.query_count(), 4);
}

#[rstest]
#[tokio::test]
async fn test_missing_team_renders_empty_state(client: Rc<MockTableClient>) {
	let repo = TeamRepository::new(client);

	let view = team_settings_view(repo.team_settings("t-404").await.as_ref());

	assert_eq!(view.text_content(), "No team settings yet.");
}

#[rstest]
#[tokio::test]
async fn test_save_user_settings_inserts_then_updates(client: Rc<MockTableClient>) {
	let repo = TeamRepository::new(Rc::clone(&client));
	let mut settings = UserSettings::for_user("u-1");
	settings.active_team_id = Some("t-1".into());

	repo.save_user_settings(&settings).await.unwrap();
	assert_eq!(client.rows(Table::UserSettings).len(), 1);

	settings.autoplay_animations = true;
	repo.save_user_settings(&settings).await.unwrap();

	let rows = client.rows(Table::UserSettings);
	assert_eq!(rows.len(), 1);
	assert_eq!(repo.user_settings("u-1").await, settings);
}

#[rstest]
#[tokio::test]
async fn test_save_failure_is_returned(client: Rc<MockTableClient>) {
	client.set_failing(true);
	let repo = TeamRepository::new(Rc::clone(&client));

	let result = repo.save_user_settings(&UserSettings::for_user("u-1")).await;

	assert!(matches!(
		result,
		Err(BackendError::Query {
			table: Table::UserSettings,
			..
		})
	));
}

#[rstest]
#[tokio::test]
async fn test_malformed_rows_degrade(#[values(json!({"team_id": "t-1", "team_name": 5}), json!({"team_id": "t-1", "sport": ["polo"]}))] row: serde_json::Value) {
	let client = Rc::new(MockTableClient::new().with_rows(Table::TeamSettings, [row]));
	let repo = TeamRepository::new(client);

	assert!(repo.team_settings("t-1").await.is_none());
}
