use showlog_core::{Appearance, Episode, Guest, ValidationError};

#[test]
fn episode_number_must_be_positive() {
    assert_eq!(
        Episode::new("1/11/99", 0).unwrap_err(),
        ValidationError::NonPositiveNumber(0)
    );
    assert_eq!(
        Episode::new("1/11/99", -1).unwrap_err(),
        ValidationError::NonPositiveNumber(-1)
    );

    let episode = Episode::new("1/11/99", 1).unwrap();
    assert_eq!(episode.number(), 1);
    assert_eq!(episode.id(), None);
}

#[test]
fn episode_date_must_not_be_empty() {
    assert_eq!(
        Episode::new("", 3).unwrap_err(),
        ValidationError::MissingDate
    );
    assert_eq!(Episode::new("any text", 3).unwrap().date(), "any text");
}

#[test]
fn failed_setter_leaves_episode_unchanged() {
    let mut episode = Episode::new("1/12/99", 2).unwrap();

    assert!(episode.set_number(0).is_err());
    assert!(episode.set_date("").is_err());
    assert_eq!(episode.number(), 2);
    assert_eq!(episode.date(), "1/12/99");

    episode.set_number(5).unwrap();
    episode.set_date("1/13/99").unwrap();
    assert_eq!(episode.number(), 5);
    assert_eq!(episode.date(), "1/13/99");
}

#[test]
fn guest_name_and_occupation_must_not_be_empty() {
    assert_eq!(
        Guest::new("", "actor").unwrap_err(),
        ValidationError::MissingGuestName
    );
    assert_eq!(
        Guest::new("Michael J. Fox", "").unwrap_err(),
        ValidationError::MissingGuestOccupation
    );

    let mut guest = Guest::new("Michael J. Fox", "actor").unwrap();
    assert_eq!(
        guest.set_name("").unwrap_err().to_string(),
        "Guest name cannot be empty."
    );
    assert_eq!(guest.name(), "Michael J. Fox");
    assert_eq!(
        guest.set_occupation("").unwrap_err().to_string(),
        "Guest occupation cannot be empty."
    );
    assert_eq!(guest.occupation(), "actor");
}

#[test]
fn appearance_rating_is_bounded() {
    for rating in [0, 6] {
        assert_eq!(
            Appearance::new(rating, 1, 1).unwrap_err(),
            ValidationError::RatingOutOfRange(rating)
        );
    }
    for rating in 1..=5 {
        assert_eq!(Appearance::new(rating, 1, 1).unwrap().rating(), rating);
    }

    let mut appearance = Appearance::new(4, 1, 1).unwrap();
    assert!(appearance.set_rating(7).is_err());
    assert_eq!(appearance.rating(), 4);
}

#[test]
fn appearance_requires_both_references() {
    assert_eq!(
        Appearance::new(3, 1, 0).unwrap_err(),
        ValidationError::MissingGuestId
    );
    assert_eq!(
        Appearance::new(3, 0, 1).unwrap_err(),
        ValidationError::MissingEpisodeId
    );

    let mut appearance = Appearance::new(3, 1, 1).unwrap();
    assert_eq!(
        appearance.set_guest_id(0).unwrap_err().to_string(),
        "Guest ID is required."
    );
    assert_eq!(
        appearance.set_episode_id(0).unwrap_err().to_string(),
        "Episode ID is required."
    );
    assert_eq!(appearance.guest_id(), 1);
    assert_eq!(appearance.episode_id(), 1);
}

#[test]
fn with_id_rejects_non_positive_ids() {
    assert_eq!(
        Episode::with_id(0, "1/11/99", 1).unwrap_err(),
        ValidationError::InvalidId(0)
    );
    assert_eq!(
        Guest::with_id(-4, "Ann", "host").unwrap_err(),
        ValidationError::InvalidId(-4)
    );
}

#[test]
fn display_matches_record_summaries() {
    let episode = Episode::new("1/11/99", 1).unwrap();
    let guest = Guest::new("Michael J. Fox", "actor").unwrap();
    let appearance = Appearance::new(4, 2, 3).unwrap();

    assert_eq!(episode.to_string(), "<Episode 1 on 1/11/99>");
    assert_eq!(guest.to_string(), "<Guest Michael J. Fox, Occupation: actor>");
    assert_eq!(
        appearance.to_string(),
        "<Appearance: Guest ID 3, Episode ID 2, Rating 4>"
    );
}

#[test]
fn entity_serialization_uses_expected_wire_fields() {
    let appearance = Appearance::with_id(9, 5, 2, 3).unwrap();

    let json = serde_json::to_value(&appearance).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 9, "rating": 5, "episode_id": 2, "guest_id": 3 })
    );

    let decoded: Appearance = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, appearance);
}

#[test]
fn deserialize_rejects_invalid_fields() {
    let err = serde_json::from_value::<Episode>(serde_json::json!({
        "date": "1/11/99",
        "number": 0
    }))
    .unwrap_err();
    assert!(
        err.to_string()
            .contains("Episode number must be a positive integer."),
        "unexpected error: {err}"
    );

    let err = serde_json::from_value::<Appearance>(serde_json::json!({
        "rating": 9,
        "episode_id": 1,
        "guest_id": 1
    }))
    .unwrap_err();
    assert!(err.to_string().contains("Rating must be between 1 and 5."));
}
