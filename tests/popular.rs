use matchgraph::algo::classified_popular;
use matchgraph::{Instance, Vertex};

fn vertex(id: &str, upper_quota: u32, preferences: &[&str]) -> Vertex {
    let mut vertex = Vertex::new(id, 0, upper_quota);
    for preference in preferences {
        vertex.preferences_mut().push(*preference);
    }
    vertex
}

#[test]
fn two_by_two_yields_a_popular_matching() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &["b1", "b2"]));
    instance.insert_applicant(vertex("a2", 1, &["b1", "b2"]));
    instance.insert_post(vertex("b1", 1, &["a1", "a2"]));
    instance.insert_post(vertex("b2", 1, &["a2", "a1"]));

    let matching = classified_popular(&instance).unwrap();
    // Both applicants are matched; one of them takes its first choice and
    // the other is promoted to its second.
    assert_eq!(matching.pair_count(), 2);
    assert!(matching.contains("a1", "b1"));
    assert!(matching.contains("a2", "b2"));
    assert_eq!(
        matching
            .applicant_partners("a1")
            .unwrap()
            .iter()
            .collect::<Vec<_>>(),
        [(1, "b1")]
    );
    assert_eq!(
        matching
            .applicant_partners("a2")
            .unwrap()
            .iter()
            .collect::<Vec<_>>(),
        [(2, "b2")]
    );
}

#[test]
fn applicant_without_preferences_has_no_popular_matching() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &[]));
    instance.insert_post(vertex("b1", 1, &[]));
    instance.insert_post(vertex("b2", 1, &[]));

    assert!(classified_popular(&instance).is_err());
}

#[test]
fn error_is_displayable() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &[]));

    let error = classified_popular(&instance).unwrap_err();
    assert_eq!(
        error.to_string(),
        "no popular matching exists for this instance"
    );
}

#[test]
fn contested_post_absorbs_the_loser_into_its_last_resort() {
    // Both applicants want only b1; one gets it, the other falls back to
    // its last resort, which never shows up in the returned matching.
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &["b1"]));
    instance.insert_applicant(vertex("a2", 1, &["b1"]));
    instance.insert_post(vertex("b1", 1, &["a1", "a2"]));

    let matching = classified_popular(&instance).unwrap();
    assert_eq!(matching.pair_count(), 1);
    assert!(matching.contains("a1", "b1"));
    assert!(!matching.applicant_is_matched("a2"));
}

#[test]
fn post_quota_admits_several_applicants() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &["b1"]));
    instance.insert_applicant(vertex("a2", 1, &["b1"]));
    instance.insert_applicant(vertex("a3", 1, &["b1"]));
    instance.insert_post(vertex("b1", 2, &["a1", "a2", "a3"]));

    let matching = classified_popular(&instance).unwrap();
    let partners = matching.post_partners("b1").unwrap();
    assert_eq!(partners.len(), 2);
    assert!(partners.contains("a1"));
    assert!(partners.contains("a2"));
}

#[test]
fn upper_quotas_are_never_exceeded() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &["b1", "b2"]));
    instance.insert_applicant(vertex("a2", 1, &["b2", "b1"]));
    instance.insert_applicant(vertex("a3", 1, &["b1", "b2"]));
    instance.insert_post(vertex("b1", 2, &["a1", "a2", "a3"]));
    instance.insert_post(vertex("b2", 1, &["a1", "a2", "a3"]));

    let matching = classified_popular(&instance).unwrap();
    for post in instance.posts() {
        let occupancy = matching.post_partners(post.id()).map_or(0, |p| p.len());
        assert!(occupancy <= post.upper_quota() as usize);
    }
    for applicant in instance.applicants() {
        let occupancy = matching
            .applicant_partners(applicant.id())
            .map_or(0, |p| p.len());
        assert!(occupancy <= applicant.upper_quota() as usize);
    }
}

#[test]
fn matched_ranks_come_from_the_preference_lists() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("a1", 1, &["b1", "b2", "b3"]));
    instance.insert_post(vertex("b1", 1, &["a1"]));
    instance.insert_post(vertex("b2", 1, &["a1"]));
    instance.insert_post(vertex("b3", 1, &["a1"]));

    let matching = classified_popular(&instance).unwrap();
    let (rank, post) = matching.applicant_partners("a1").unwrap().iter().next().unwrap();
    assert_eq!((rank, post), (1, "b1"));
    // The post records a1's rank on its own list.
    let (rank, applicant) = matching.post_partners("b1").unwrap().iter().next().unwrap();
    assert_eq!((rank, applicant), (1, "a1"));
}
