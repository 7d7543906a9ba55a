use serde_json::json;
use showlog_core::db::open_db_in_memory;
use showlog_core::{RouteTable, ServiceError, SqliteShowService};

fn service(conn: &rusqlite::Connection) -> SqliteShowService<'_> {
    SqliteShowService::open(conn, RouteTable::new("http://localhost:5555")).unwrap()
}

#[test]
fn create_flow_returns_representations() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Michael J. Fox", "occupation": "actor" }))
        .unwrap();
    let appearance = service
        .create_appearance(&json!({
            "rating": 4,
            "episode_id": episode.id,
            "guest_id": guest.id
        }))
        .unwrap();

    assert!(episode.appearance_list.is_empty());
    assert_eq!(appearance.episode_id, Some(episode.id));
    assert_eq!(appearance.guest_id, Some(guest.id));
    assert_eq!(
        appearance.links.self_link,
        format!("http://localhost:5555/appearances/{}", appearance.id)
    );

    let reloaded = service.episode(episode.id).unwrap();
    assert_eq!(reloaded.appearance_list.len(), 1);
    assert_eq!(reloaded.appearance_list[0].id, appearance.id);
    assert_eq!(reloaded.appearance_list[0].episode_id, None);
}

#[test]
fn episode_with_two_appearances_nests_both() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let other = service
        .create_episode(&json!({ "date": "1/12/99", "number": 2 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Sandra Bernhard", "occupation": "Comedian" }))
        .unwrap();
    for (episode_id, rating) in [(episode.id, 5), (episode.id, 3), (other.id, 1)] {
        service
            .create_appearance(&json!({
                "rating": rating,
                "episode_id": episode_id,
                "guest_id": guest.id
            }))
            .unwrap();
    }

    let repr = service.episode(episode.id).unwrap();
    let ratings: Vec<i64> = repr
        .appearance_list
        .iter()
        .map(|appearance| appearance.rating)
        .collect();
    assert_eq!(ratings, vec![5, 3]);
    assert!(repr
        .appearance_list
        .iter()
        .all(|appearance| appearance.episode_id.is_none() && appearance.links.episode.is_none()));

    let listed = service.episodes().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].appearance_list.len(), 2);
    assert_eq!(listed[1].appearance_list.len(), 1);

    assert_eq!(service.guest(guest.id).unwrap().appearance_list.len(), 3);
}

#[test]
fn invalid_rating_is_rejected_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();

    let err = service
        .create_appearance(&json!({
            "rating": 7,
            "episode_id": episode.id,
            "guest_id": guest.id
        }))
        .unwrap_err();
    match err {
        ServiceError::Schema(schema_err) => {
            let errors = schema_err.field_errors().unwrap();
            assert_eq!(
                errors.get("rating").unwrap(),
                ["Rating must be between 1 and 5.".to_string()]
            );
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(service.appearances().unwrap().is_empty());
}

#[test]
fn appearance_for_missing_episode_is_a_repo_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();

    let err = service
        .create_appearance(&json!({ "rating": 3, "episode_id": 50, "guest_id": guest.id }))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert!(service.appearances().unwrap().is_empty());
}

#[test]
fn update_uses_path_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();
    let updated = service
        .update_guest(
            guest.id,
            &json!({ "id": 999, "name": "Ann", "occupation": "producer" }),
        )
        .unwrap();

    assert_eq!(updated.id, guest.id);
    assert_eq!(updated.occupation, "producer");
    assert!(matches!(
        service.guest(999).unwrap_err(),
        ServiceError::NotFound { entity: "guest", id: 999 }
    ));
}

#[test]
fn update_ignores_malformed_payload_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();
    let appearance = service
        .create_appearance(&json!({ "rating": 2, "episode_id": episode.id, "guest_id": guest.id }))
        .unwrap();

    let updated = service
        .update_episode(episode.id, &json!({ "id": 0, "date": "2/2/99", "number": 2 }))
        .unwrap();
    assert_eq!(updated.id, episode.id);
    assert_eq!(updated.number, 2);

    let updated = service
        .update_guest(
            guest.id,
            &json!({ "id": "x", "name": "Ann", "occupation": "producer" }),
        )
        .unwrap();
    assert_eq!(updated.id, guest.id);
    assert_eq!(updated.occupation, "producer");

    let updated = service
        .update_appearance(
            appearance.id,
            &json!({ "id": -4, "rating": 5, "episode_id": episode.id, "guest_id": guest.id }),
        )
        .unwrap();
    assert_eq!(updated.id, appearance.id);
    assert_eq!(updated.rating, 5);
}

#[test]
fn update_missing_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .update_episode(3, &json!({ "date": "1/11/99", "number": 1 }))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "episode",
            id: 3
        }
    ));
}

#[test]
fn deleting_parents_cascades_through_service() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();
    let appearance = service
        .create_appearance(&json!({ "rating": 2, "episode_id": episode.id, "guest_id": guest.id }))
        .unwrap();

    assert_eq!(service.delete_guest(guest.id).unwrap(), 1);
    assert!(matches!(
        service.appearance(appearance.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(service.episode(episode.id).unwrap().appearance_list.is_empty());

    assert_eq!(service.delete_episode(episode.id).unwrap(), 0);
    assert!(service.episodes().unwrap().is_empty());
}

#[test]
fn update_appearance_revalidates_rating() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let episode = service
        .create_episode(&json!({ "date": "1/11/99", "number": 1 }))
        .unwrap();
    let guest = service
        .create_guest(&json!({ "name": "Ann", "occupation": "host" }))
        .unwrap();
    let appearance = service
        .create_appearance(&json!({ "rating": 2, "episode_id": episode.id, "guest_id": guest.id }))
        .unwrap();

    let err = service
        .update_appearance(
            appearance.id,
            &json!({ "rating": 0, "episode_id": episode.id, "guest_id": guest.id }),
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Schema(_)));

    let updated = service
        .update_appearance(
            appearance.id,
            &json!({ "rating": 5, "episode_id": episode.id, "guest_id": guest.id }),
        )
        .unwrap();
    assert_eq!(updated.rating, 5);
    service.delete_appearance(appearance.id).unwrap();
    assert!(service.appearances().unwrap().is_empty());
}
