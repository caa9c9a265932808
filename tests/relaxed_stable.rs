use matchgraph::algo::{is_relaxed_stable, relaxed_stable};
use matchgraph::{Instance, Vertex};

fn vertex(id: &str, lower_quota: u32, upper_quota: u32, preferences: &[&str]) -> Vertex {
    let mut vertex = Vertex::new(id, lower_quota, upper_quota);
    for preference in preferences {
        vertex.preferences_mut().push(*preference);
    }
    vertex
}

#[test]
fn one_hospital_with_binding_lower_quota() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h"]));
    instance.insert_applicant(vertex("r3", 0, 1, &["h"]));
    instance.insert_post(vertex("h", 2, 2, &["r1", "r2", "r3"]));

    let matching = relaxed_stable(&instance).unwrap();
    let partners = matching.post_partners("h").unwrap();
    assert_eq!(partners.len(), 2);
    assert!(partners.contains("r1"));
    assert!(partners.contains("r2"));
    assert!(!matching.applicant_is_matched("r3"));
    assert!(is_relaxed_stable(&instance, &matching));
}

#[test]
fn seed_is_improved_by_proposals() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h1", "h2"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h2", "h1"]));
    instance.insert_applicant(vertex("r3", 0, 1, &["h1"]));
    instance.insert_post(vertex("h1", 1, 2, &["r1", "r2", "r3"]));
    instance.insert_post(vertex("h2", 0, 1, &["r2", "r1"]));

    let matching = relaxed_stable(&instance).unwrap();
    assert!(matching.contains("r1", "h1"));
    assert!(matching.contains("r2", "h2"));
    assert!(matching.contains("r3", "h1"));
    assert!(is_relaxed_stable(&instance, &matching));
}

#[test]
fn applicant_without_preferences_is_infeasible() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &[]));
    instance.insert_post(vertex("h1", 0, 1, &[]));

    let error = relaxed_stable(&instance).unwrap_err();
    assert_eq!(
        error.to_string(),
        "no feasible matching satisfies the lower quotas"
    );
}

#[test]
fn zero_lower_quotas_reduce_to_plain_proposals() {
    // With no lower quota to pre-fill, the seed is empty and the proposal
    // loop alone builds the matching.
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h1", "h2"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h1", "h2"]));
    instance.insert_post(vertex("h1", 0, 1, &["r2", "r1"]));
    instance.insert_post(vertex("h2", 0, 1, &["r1", "r2"]));

    let matching = relaxed_stable(&instance).unwrap();
    // h1 keeps the resident it prefers; the displaced one lands on h2.
    assert!(matching.contains("r2", "h1"));
    assert!(matching.contains("r1", "h2"));
    assert!(is_relaxed_stable(&instance, &matching));
}

#[test]
fn quotas_are_respected() {
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h1", "h2"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h1"]));
    instance.insert_applicant(vertex("r3", 0, 1, &["h1", "h2"]));
    instance.insert_applicant(vertex("r4", 0, 1, &["h2", "h1"]));
    instance.insert_post(vertex("h1", 1, 2, &["r1", "r2", "r3", "r4"]));
    instance.insert_post(vertex("h2", 1, 1, &["r4", "r3", "r1"]));

    let matching = relaxed_stable(&instance).unwrap();
    for post in instance.posts() {
        let occupancy = matching.post_partners(post.id()).map_or(0, |p| p.len());
        assert!(occupancy <= post.upper_quota() as usize);
        assert!(occupancy >= post.lower_quota() as usize);
    }
    for applicant in instance.applicants() {
        let occupancy = matching
            .applicant_partners(applicant.id())
            .map_or(0, |p| p.len());
        assert!(occupancy <= applicant.upper_quota() as usize);
    }
}

#[test]
fn predicate_rejects_a_deficient_assignment() {
    // r1 would rather have h1, which has room: the pair blocks, and since
    // r1 is unmatched the matching cannot be relaxed stable.
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h1"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h1"]));
    instance.insert_post(vertex("h1", 0, 2, &["r1", "r2"]));

    let mut matching = matchgraph::Matching::new();
    matching.add("r2", "h1", 1, 2);
    assert!(!is_relaxed_stable(&instance, &matching));
}

#[test]
fn predicate_accepts_rejections_by_preference() {
    // h1 is full with residents it prefers to r3: r3 is unmatched but not
    // in any blocking pair.
    let mut instance = Instance::new();
    instance.insert_applicant(vertex("r1", 0, 1, &["h1"]));
    instance.insert_applicant(vertex("r2", 0, 1, &["h1"]));
    instance.insert_applicant(vertex("r3", 0, 1, &["h1"]));
    instance.insert_post(vertex("h1", 0, 2, &["r1", "r2", "r3"]));

    let mut matching = matchgraph::Matching::new();
    matching.add("r1", "h1", 1, 1);
    matching.add("r2", "h1", 1, 2);
    assert!(is_relaxed_stable(&instance, &matching));
}
