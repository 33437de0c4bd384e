use dailyzen_core::{Document, Habit, Item, Profile, ScheduleEntry};
use serde_json::json;

#[test]
fn seed_matches_sample_content() {
    let seed = Document::seed();

    assert_eq!(
        seed.habits,
        vec![
            Habit::new("Exercise", false, 3),
            Habit::new("Meditation", true, 10),
            Habit::new("Reading", false, 1),
        ]
    );
    let items = seed
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.carried))
        .collect::<Vec<_>>();
    assert_eq!(
        items,
        vec![("Laptop", true), ("ID Card", false), ("Water Bottle", true)]
    );
    assert_eq!(seed.schedules[0].title, "Team Meeting");
    assert_eq!(seed.schedules[0].date, "");
    assert_eq!(seed.profile.unwrap().username, "demo");
}

#[test]
fn records_serialize_with_expected_wire_fields() {
    let item = Item::new("Keys").unwrap();
    assert_eq!(
        serde_json::to_value(&item).unwrap(),
        json!({"name": "Keys", "carried": false})
    );

    let entry = ScheduleEntry::new("Standup", "2026-10-20", "").unwrap();
    assert_eq!(
        serde_json::to_value(&entry).unwrap(),
        json!({"title": "Standup", "date": "2026-10-20", "time": "", "status": "upcoming"})
    );
}

#[test]
fn partial_records_fill_defaults() {
    let document: Document = serde_json::from_value(json!({
        "habits": [{"name": "Stretch"}],
        "schedules": [{"title": "Call mom"}],
        "profile": {"username": "zen", "avatar": "x.png"}
    }))
    .unwrap();

    assert_eq!(document.habits[0], Habit::new("Stretch", false, 0));
    assert_eq!(document.schedules[0].status, "upcoming");
    assert_eq!(document.profile, Some(Profile::new("zen").unwrap()));
}

#[test]
fn document_without_profile_omits_the_key() {
    let value = serde_json::to_value(Document::default()).unwrap();
    assert_eq!(value, json!({"habits": [], "items": [], "schedules": []}));
}

#[test]
fn empty_required_fields_are_rejected() {
    assert_eq!(Item::new("").unwrap_err().field, "name");
    assert_eq!(ScheduleEntry::new("", "", "").unwrap_err().field, "title");
    assert_eq!(Profile::new("").unwrap_err().to_string(), "username is required");
}

#[test]
fn null_schedule_status_reads_as_upcoming() {
    let document: Document = serde_json::from_value(json!({
        "schedules": [{"title": "Gym", "status": null}, {"title": "Swim", "status": "done"}],
        "profile": null
    }))
    .unwrap();

    assert_eq!(document.schedules[0].status, "upcoming");
    assert_eq!(document.schedules[1].status, "done");
    assert_eq!(document.profile, None);
}

#[test]
fn record_extras_round_trip_but_profile_extras_do_not() {
    let source = json!({
        "habits": [{"name": "Stretch", "completed": false, "streak": 2, "last_done": "2026-10-18"}],
        "items": [],
        "schedules": [],
        "profile": {"username": "zen", "avatar": "x.png"}
    });
    let document: Document = serde_json::from_value(source.clone()).unwrap();

    assert_eq!(document.habits[0].extra["last_done"], "2026-10-18");
    let written = serde_json::to_value(&document).unwrap();
    assert_eq!(written["habits"], source["habits"]);
    assert_eq!(written["profile"], json!({"username": "zen"}));
}
