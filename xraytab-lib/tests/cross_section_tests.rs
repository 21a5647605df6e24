mod common;

use approx::assert_relative_eq;
use common::{
    CHANTLER_ENERGIES, FE_K_EDGE, chantler_f1, chantler_f2, chantler_mu_incoh, chantler_mu_photo,
    coherent, fixture_db, incoherent, photo,
};
use rstest::rstest;
use xraytab::{ChantlerKind, CrossSectionKind, XrayDbError};

#[rstest]
#[case(500.0)]
#[case(2000.0)]
#[case(7000.0)]
#[case(7200.0)]
#[case(25000.0)]
#[case(300000.0)]
fn test_mu_elam_photo_follows_power_law(#[case] energy: f64) {
    let db = fixture_db();
    let mu = db.mu_elam("Fe", &[energy], CrossSectionKind::Photo).unwrap();
    assert_relative_eq!(mu[0], photo(26, energy), max_relative = 1e-9);
}

#[test]
fn test_mu_elam_jumps_at_edge() {
    let db = fixture_db();
    let mu = db
        .mu_elam(
            "iron",
            &[FE_K_EDGE - 1.0, FE_K_EDGE + 1.0],
            CrossSectionKind::Photo,
        )
        .unwrap();
    assert!(mu[1] > 7.0 * mu[0], "no edge jump: {mu:?}");
}

#[test]
fn test_mu_elam_total_is_sum_of_parts() {
    let db = fixture_db();
    let energies = [1500.0, 12000.0, 60000.0];
    let total = db.mu_elam("Si", &energies, CrossSectionKind::Total).unwrap();
    let coh = db.coherent_cross_section_elam("Si", &energies).unwrap();
    let incoh = db.incoherent_cross_section_elam("Si", &energies).unwrap();
    for (i, &e) in energies.iter().enumerate() {
        assert_relative_eq!(coh[i], coherent(14, e), max_relative = 1e-9);
        assert_relative_eq!(incoh[i], incoherent(14), max_relative = 1e-9);
        assert_relative_eq!(
            total[i],
            photo(14, e) + coherent(14, e) + incoherent(14),
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_mu_elam_clamps_to_table_range() {
    let db = fixture_db();
    let mu = db
        .mu_elam("Cu", &[1.0, 50.0, 100.0, 1e6, 5e7], CrossSectionKind::Photo)
        .unwrap();
    assert_relative_eq!(mu[0], photo(29, 100.0), max_relative = 1e-9);
    assert_relative_eq!(mu[1], mu[2], max_relative = 1e-12);
    assert_relative_eq!(mu[4], photo(29, 1e6), max_relative = 1e-9);
    assert_relative_eq!(mu[3], mu[4], max_relative = 1e-12);
}

#[test]
fn test_mu_elam_scalar_and_vector_agree() {
    let db = fixture_db();
    let vector = db.mu_elam(8u16, &[3000.0], CrossSectionKind::Total).unwrap();
    let scalar = db.mu_elam_at("O", 3000.0, CrossSectionKind::Total).unwrap();
    assert_eq!(vector[0], scalar);
}

#[test]
fn test_cross_section_kind_names() {
    let db = fixture_db();
    let kind: CrossSectionKind = "coh".parse().unwrap();
    let mu = db.cross_section_elam("C", &[10000.0], kind).unwrap();
    assert_relative_eq!(mu[0], coherent(6, 10000.0), max_relative = 1e-9);
    assert!(matches!(
        "compton".parse::<CrossSectionKind>(),
        Err(XrayDbError::UnknownKind(_))
    ));
}

#[test]
fn test_mu_elam_unknown_element() {
    let db = fixture_db();
    assert!(matches!(
        db.mu_elam("Xx", &[1000.0], CrossSectionKind::Photo),
        Err(XrayDbError::UnknownElement(_))
    ));
}

#[test]
fn test_f1_chantler_reproduces_linear_table() {
    let db = fixture_db();
    let energies = [1500.0, 8000.0, 8000.5, 33000.0];
    let f1 = db.f1_chantler("Fe", &energies).unwrap();
    for (value, &e) in f1.iter().zip(&energies) {
        assert_relative_eq!(*value, chantler_f1(e), epsilon = 1e-9);
    }
}

#[test]
fn test_f1_chantler_smoothed_keeps_a_straight_line() {
    let db = fixture_db();
    let f1 = db.f1_chantler_smoothed("Si", &[12000.0], 1e-3).unwrap();
    assert_relative_eq!(f1[0], chantler_f1(12000.0), epsilon = 1e-6);
}

#[test]
fn test_f2_chantler_loglog() {
    let db = fixture_db();
    let energies = [3000.0, 10000.0, 55000.0];
    let f2 = db.f2_chantler("O", &energies).unwrap();
    for (value, &e) in f2.iter().zip(&energies) {
        assert_relative_eq!(*value, chantler_f2(8, e), max_relative = 1e-9);
    }
}

#[test]
fn test_f2_chantler_extrapolates_past_table() {
    let db = fixture_db();
    let f2 = db.f2_chantler("O", &[500.0, 150000.0]).unwrap();
    assert_relative_eq!(f2[0], chantler_f2(8, 500.0), max_relative = 1e-9);
    assert_relative_eq!(f2[1], chantler_f2(8, 150000.0), max_relative = 1e-9);
}

#[test]
fn test_mu_chantler_kinds() {
    let db = fixture_db();
    let e = [CHANTLER_ENERGIES[5]];
    let total = db.mu_chantler("Si", &e, ChantlerKind::Total).unwrap();
    let photo = db.mu_chantler("Si", &e, ChantlerKind::Photo).unwrap();
    let incoh = db.mu_chantler("Si", &e, ChantlerKind::Incoherent).unwrap();
    assert_relative_eq!(photo[0], chantler_mu_photo(14, e[0]), max_relative = 1e-9);
    assert_relative_eq!(incoh[0], chantler_mu_incoh(14, e[0]), max_relative = 1e-9);
    assert_relative_eq!(total[0], photo[0] + incoh[0], max_relative = 1e-9);
}

#[test]
fn test_chantler_empty_query() {
    let db = fixture_db();
    assert!(db.f1_chantler("Fe", &[]).unwrap().is_empty());
    assert!(db.mu_chantler("Fe", &[], ChantlerKind::Total).unwrap().is_empty());
}

#[test]
fn test_chantler_missing_table() {
    let db = fixture_db();
    assert!(matches!(
        db.f2_chantler("Pb", &[10000.0]),
        Err(XrayDbError::MissingTable { .. })
    ));
}

#[test]
fn test_chantler_energies_range() {
    let db = fixture_db();
    let all = db.chantler_energies("Fe", None, None).unwrap();
    assert_eq!(all, CHANTLER_ENERGIES.to_vec());

    let some = db.chantler_energies("Fe", Some(5000.0), Some(12000.0)).unwrap();
    assert_eq!(some, vec![2000.0, 4000.0, 7000.0, 10000.0, 15000.0, 20000.0]);

    let top = db.chantler_energies("Fe", Some(50000.0), Some(1e6)).unwrap();
    assert_eq!(top, vec![20000.0, 40000.0, 70000.0, 100000.0]);
}
