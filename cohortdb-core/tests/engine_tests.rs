//! Integration tests for the query engine over a small trio dataset.
//!
//! The fixture mirrors a GRCh37 father/mother/son trio with a handful
//! of hand-picked variants whose statistics are easy to verify.

use cohortdb_core::engine::{
    DatasetRegistry, InheritanceQuery, KinshipQuery, PrsQuery, QueryEngine, RegionQuery,
    SexCheckQuery,
};
use cohortdb_core::error::QueryError;
use cohortdb_core::exec::CancelToken;
use cohortdb_core::inherit::{AffectedParent, InheritanceModel};
use cohortdb_core::request::{ExecMode, GenotypeClasses, PrsModel, Trio};
use cohortdb_core::stats::kinship::KinshipDegree;
use cohortdb_geno::cohort::{CohortRegistry, SampleInfo, Sex};
use cohortdb_geno::genotype::{Genotype, GenotypeRow};
use cohortdb_geno::matrix::{GenotypeMatrix, VariantRecord};
use cohortdb_geno::panel::PanelRegistry;
use cohortdb_geno::prs::PrsRegistry;
use cohortdb_geno::region::Region;
use cohortdb_geno::store::Store;
use cohortdb_geno::variant::{Assembly, Chromosome, VariantSite};

use Genotype::{AltAlt, Missing, RefAlt, RefRef};

fn row(chrom: Chromosome, pos: u32, r: &str, a: &str, calls: [Genotype; 3]) -> VariantRecord {
    VariantRecord {
        site: VariantSite::at(chrom, pos, r, a),
        genotypes: GenotypeRow::from_calls(&calls),
    }
}

/// Columns are HG002 (son), HG003 (father), HG004 (mother).
fn trio_engine() -> QueryEngine {
    let samples = vec![
        SampleInfo::new("HG002", Sex::Male),
        SampleInfo::new("HG003", Sex::Male),
        SampleInfo::new("HG004", Sex::Female),
    ];
    let records = vec![
        // fixed site: everyone hom-alt
        row(Chromosome::Chr1, 880238, "A", "G", [AltAlt, AltAlt, AltAlt]),
        // singleton het in the son, absent from both parents
        row(Chromosome::Chr1, 880390, "C", "A", [RefAlt, RefRef, RefRef]),
        // ac=5: two hom-alt plus one het
        row(Chromosome::Chr1, 881627, "G", "A", [AltAlt, AltAlt, RefAlt]),
        // recessive pattern: both parents carriers, son hom
        row(Chromosome::Chr1, 900100, "T", "C", [AltAlt, RefAlt, RefAlt]),
        // dominant pattern: affected father and son het, mother ref
        row(Chromosome::Chr1, 900200, "G", "T", [RefAlt, RefAlt, RefRef]),
        // site with a missing call
        row(Chromosome::Chr1, 900300, "A", "C", [RefAlt, Missing, RefRef]),
        // TTN-ish block on chr2 for multi-region tests
        row(Chromosome::Chr2, 179400000, "C", "T", [RefAlt, RefRef, RefAlt]),
        row(Chromosome::Chr2, 179500000, "A", "G", [RefRef, RefAlt, RefRef]),
        row(Chromosome::Chr2, 179600000, "G", "A", [AltAlt, RefAlt, RefAlt]),
        // TP53 exon variant for the panel test
        row(Chromosome::Chr17, 7578406, "C", "T", [RefAlt, RefRef, RefRef]),
        // chrX deletion: hemizygous males stored as hom, female hom
        row(Chromosome::ChrX, 155237350, "AC", "A", [AltAlt, AltAlt, AltAlt]),
        // polymorphic chrX sites for the sex check
        row(Chromosome::ChrX, 1000000, "A", "G", [RefRef, AltAlt, RefAlt]),
        row(Chromosome::ChrX, 2000000, "C", "T", [AltAlt, RefRef, RefAlt]),
        row(Chromosome::ChrX, 3000000, "G", "A", [RefRef, AltAlt, RefAlt]),
    ];
    let matrix = GenotypeMatrix::load(Assembly::Grch37, samples, records).unwrap();

    let mut cohorts = CohortRegistry::new();
    cohorts.insert(
        "trio",
        vec!["HG002".into(), "HG003".into(), "HG004".into()],
    );

    let panel_text = "cancer\tTP53\t17\t7565097\t7590856\ncancer\tTTN\t2\t179390716\t179695529\n";
    let panels =
        PanelRegistry::from_reader(std::io::BufReader::new(panel_text.as_bytes())).unwrap();

    let prs_text = "afib\t1\t880238\tA\tG\t0.1\nafib\t1\t880390\tC\tA\t0.2\nafib\t9\t5000\tA\tG\t9.9\n";
    let prs = PrsRegistry::from_reader(std::io::BufReader::new(prs_text.as_bytes())).unwrap();

    let mut registry = DatasetRegistry::new();
    registry.insert(Store::new(matrix, panels, cohorts, prs));
    QueryEngine::new(registry)
}

fn trio() -> Trio {
    Trio {
        mother: "HG004".into(),
        father: "HG003".into(),
        proband: "HG002".into(),
    }
}

#[test]
fn test_fixed_site_region_query() {
    let engine = trio_engine();
    let req = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr1, 880200, 880238)],
        GenotypeClasses::from_flags(true, true),
    );
    let hits = engine.region_query(&req).unwrap();
    assert_eq!(hits.len(), 1);
    let hit = &hits[0];
    assert_eq!(hit.site.start, 880238);
    assert_eq!(hit.site.end, 880238);
    assert_eq!(hit.stats.af, 1.0);
    assert_eq!(hit.stats.ac, 6);
    assert_eq!(hit.stats.an, 6);
    assert_eq!(hit.stats.homc, 3);
    assert_eq!(hit.stats.hetc, 0);
    assert_eq!(hit.stats.misc, 0);
    assert_eq!(hit.samples, vec!["HG002", "HG003", "HG004"]);
}

#[test]
fn test_genotype_class_filters() {
    let engine = trio_engine();
    let region = vec![Region::new(Chromosome::Chr1, 880200, 882000)];

    let hom_only = RegionQuery::new(
        Assembly::Grch37,
        region.clone(),
        GenotypeClasses::from_flags(true, false),
    );
    let hits = engine.region_query(&hom_only).unwrap();
    // the singleton het row has no hom-alt carriers
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.site.start != 880390));

    let neither = RegionQuery::new(Assembly::Grch37, region, GenotypeClasses::from_flags(false, false));
    assert!(engine.region_query(&neither).unwrap().is_empty());
}

#[test]
fn test_allele_literal_filters() {
    let engine = trio_engine();
    let mut req = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr1, 1, 2_000_000)],
        GenotypeClasses::from_flags(true, true),
    );
    req.ref_filter = Some("G".into());
    req.alt_filter = Some("A".into());
    let hits = engine.region_query(&req).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].site.start, 881627);
}

#[test]
fn test_multi_region_union_equals_single_region() {
    let engine = trio_engine();
    let whole = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr2, 179390716, 179695529)],
        GenotypeClasses::from_flags(true, true),
    );
    let whole_hits = engine.region_query(&whole).unwrap();
    assert_eq!(whole_hits.len(), 3);

    // overlapping split plus an exact duplicate of one sub-range
    let split = RegionQuery::new(
        Assembly::Grch37,
        vec![
            Region::new(Chromosome::Chr2, 179390716, 179550000),
            Region::new(Chromosome::Chr2, 179450000, 179695529),
            Region::new(Chromosome::Chr2, 179390716, 179550000),
        ],
        GenotypeClasses::from_flags(true, true),
    );
    let split_hits = engine.region_query(&split).unwrap();
    assert_eq!(split_hits, whole_hits);
}

#[test]
fn test_virtual_cohort_of_everyone_matches_whole_cohort() {
    let engine = trio_engine();
    let mut req = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr1, 1, 1_000_000)],
        GenotypeClasses::from_flags(true, true),
    );
    req.samples = vec!["HG002".into(), "HG003".into(), "HG004".into()];
    req.with_vc_stats = true;
    let hits = engine.region_query(&req).unwrap();
    assert!(!hits.is_empty());
    for hit in &hits {
        assert_eq!(hit.vc_stats.unwrap(), hit.stats);
    }
}

#[test]
fn test_virtual_cohort_scoped_stats() {
    let engine = trio_engine();
    let mut req = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr1, 881627, 881627)],
        GenotypeClasses::from_flags(true, true),
    );
    req.samples = vec!["HG003".into(), "HG004".into()];
    req.with_vc_stats = true;
    let hits = engine.region_query(&req).unwrap();
    assert_eq!(hits.len(), 1);
    // whole-cohort stats are unchanged by the scope
    assert_eq!(hits[0].stats.ac, 5);
    assert_eq!(hits[0].stats.an, 6);
    let vc = hits[0].vc_stats.unwrap();
    assert_eq!(vc.ac, 3);
    assert_eq!(vc.an, 4);
    assert!((vc.af - 0.75).abs() < 1e-12);
    assert_eq!(vc.homc, 1);
    assert_eq!(vc.hetc, 1);
    assert_eq!(hits[0].samples, vec!["HG003", "HG004"]);
}

#[test]
fn test_assembly_isolation() {
    let engine = trio_engine();
    for assembly in [Assembly::Grch38, Assembly::Unspecified] {
        let req = RegionQuery::new(
            assembly,
            vec![Region::new(Chromosome::Chr1, 1, 2_000_000)],
            GenotypeClasses::from_flags(true, true),
        );
        assert!(engine.region_query(&req).unwrap().is_empty());
    }
}

#[test]
fn test_unknown_cohort_and_samples_are_empty_not_errors() {
    let engine = trio_engine();
    let mut req = RegionQuery::new(
        Assembly::Grch37,
        vec![Region::new(Chromosome::Chr1, 1, 2_000_000)],
        GenotypeClasses::from_flags(true, true),
    );
    req.cohort = Some("no-such-cohort".into());
    assert!(engine.region_query(&req).unwrap().is_empty());

    req.cohort = None;
    req.samples = vec!["NA12878".into()];
    assert!(engine.region_query(&req).unwrap().is_empty());
}

#[test]
fn test_chrx_homozygote_split() {
    let engine = trio_engine();
    let site = VariantSite::at(Chromosome::ChrX, 155237350, "AC", "A");
    let (found, stats) = engine.variant_lookup(Assembly::Grch37, &site).unwrap();
    assert_eq!(found.end, 155237351);
    assert_eq!(stats.an, 6);
    assert_eq!(stats.homc, 2);
    assert_eq!(stats.homfc, 1);

    let missing = VariantSite::at(Chromosome::ChrX, 155237350, "AC", "G");
    assert!(engine.variant_lookup(Assembly::Grch37, &missing).is_none());
}

#[test]
fn test_panel_query() {
    let engine = trio_engine();
    let req = RegionQuery::new(
        Assembly::Grch37,
        Vec::new(),
        GenotypeClasses::from_flags(true, true),
    );
    let hits = engine.panel_query("cancer", req.clone()).unwrap();
    // TP53 variant plus the three TTN-block variants
    assert_eq!(hits.len(), 4);

    assert!(engine.panel_query("no-such-panel", req).unwrap().is_empty());
}

#[test]
fn test_top_hwe_parallel_equals_sequential() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    let par = engine
        .top_n_hwe(Assembly::Grch37, 5, ExecMode::Parallel, &cancel)
        .unwrap();
    let seq = engine
        .top_n_hwe(Assembly::Grch37, 5, ExecMode::Sequential, &cancel)
        .unwrap();
    assert_eq!(par, seq);
    assert_eq!(par.len(), 5);
    for pair in par.windows(2) {
        assert!(pair[0].p_value <= pair[1].p_value);
    }
    for v in &par {
        assert!((0.0..=1.0).contains(&v.p_value));
    }
}

#[test]
fn test_top_chi2_parallel_equals_sequential() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    let samples = vec!["HG002".to_string()];
    let par = engine
        .top_n_chi2(Assembly::Grch37, None, &samples, 6, ExecMode::Parallel, &cancel)
        .unwrap();
    let seq = engine
        .top_n_chi2(Assembly::Grch37, None, &samples, 6, ExecMode::Sequential, &cancel)
        .unwrap();
    assert_eq!(par, seq);
    assert!(!par.is_empty());
    for pair in par.windows(2) {
        assert!(pair[0].p_value <= pair[1].p_value);
    }
}

#[test]
fn test_top_chi2_without_resolvable_samples_is_empty() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    let unknown = vec!["NA12878".to_string()];
    let hits = engine
        .top_n_chi2(Assembly::Grch37, None, &unknown, 5, ExecMode::Parallel, &cancel)
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_cancellation_aborts_ranking() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = engine.top_n_hwe(Assembly::Grch37, 5, ExecMode::Parallel, &cancel);
    assert!(matches!(result, Err(QueryError::Cancelled)));
}

#[test]
fn test_kinship_trio_pairs_and_filters() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    let mut req = KinshipQuery {
        assembly: Assembly::Grch37,
        cohort: Some("trio".into()),
        samples: Vec::new(),
        threshold: None,
        degree: None,
        mode: ExecMode::Parallel,
    };
    let all = engine.kinship(&req, &cancel).unwrap();
    assert_eq!(all.len(), 3);

    req.mode = ExecMode::Sequential;
    assert_eq!(engine.kinship(&req, &cancel).unwrap(), all);

    // a phi threshold above every pair's value filters them all out
    req.threshold = Some(0.6);
    assert!(engine.kinship(&req, &cancel).unwrap().is_empty());

    // degree cutoff keeps only pairs at or above the band
    req.threshold = None;
    req.degree = Some(KinshipDegree::FirstDegree);
    let close = engine.kinship(&req, &cancel).unwrap();
    for pair in &close {
        assert!(pair.degree >= KinshipDegree::FirstDegree);
    }

    // unknown cohort reduces to an empty pair set
    req.degree = None;
    req.cohort = Some("nope".into());
    assert!(engine.kinship(&req, &cancel).unwrap().is_empty());
}

#[test]
fn test_kinship_duplicate_columns() {
    // identical genotype columns must classify as Duplicate
    let samples = vec![
        SampleInfo::new("a", Sex::Unknown),
        SampleInfo::new("b", Sex::Unknown),
    ];
    let records = (0..50)
        .map(|i| {
            let gt = match i % 3 {
                0 => RefAlt,
                1 => AltAlt,
                _ => RefRef,
            };
            VariantRecord {
                site: VariantSite::at(Chromosome::Chr1, 1000 + i, "A", "G"),
                genotypes: GenotypeRow::from_calls(&[gt, gt]),
            }
        })
        .collect();
    let matrix = GenotypeMatrix::load(Assembly::Grch37, samples, records).unwrap();
    let mut registry = DatasetRegistry::new();
    registry.insert(Store::new(
        matrix,
        PanelRegistry::new(),
        CohortRegistry::new(),
        PrsRegistry::new(),
    ));
    let engine = QueryEngine::new(registry);

    let req = KinshipQuery {
        assembly: Assembly::Grch37,
        cohort: None,
        samples: Vec::new(),
        threshold: None,
        degree: None,
        mode: ExecMode::Sequential,
    };
    let pairs = engine.kinship(&req, &CancelToken::new()).unwrap();
    assert_eq!(pairs.len(), 1);
    assert!((pairs[0].phi - 0.5).abs() < 1e-12);
    assert_eq!(pairs[0].degree, KinshipDegree::Duplicate);
}

#[test]
fn test_sex_check_thresholds() {
    let engine = trio_engine();
    // males in the fixture carry no chrX hets, so F = 1.0 for both;
    // the mother is het at every polymorphic site, so her F is low
    let cancel = CancelToken::new();
    let records = engine
        .sex_check(&SexCheckQuery::with_defaults(Assembly::Grch37), &cancel)
        .unwrap();
    assert_eq!(records.len(), 3);

    // the sequential mode returns the identical report
    let mut seq_req = SexCheckQuery::with_defaults(Assembly::Grch37);
    seq_req.mode = ExecMode::Sequential;
    assert_eq!(engine.sex_check(&seq_req, &cancel).unwrap(), records);
    let by_name = |n: &str| records.iter().find(|r| r.sample == n).unwrap();
    assert!((by_name("HG002").f_stat - 1.0).abs() < 1e-12);
    assert!((by_name("HG003").f_stat - 1.0).abs() < 1e-12);
    assert!(by_name("HG004").f_stat < 0.5);
    assert!(records.iter().all(|r| !r.mismatch));

    // raising the male threshold above 1.0 flags both males
    let mut strict = SexCheckQuery::with_defaults(Assembly::Grch37);
    strict.male_threshold = 1.1;
    strict.mismatches_only = true;
    let mismatches = engine.sex_check(&strict, &cancel).unwrap();
    assert_eq!(mismatches.len(), 2);
    assert!(mismatches.iter().all(|r| r.declared_sex == Sex::Male));

    // lowering the female threshold below her F flags the mother
    let mut strict_f = SexCheckQuery::with_defaults(Assembly::Grch37);
    strict_f.female_threshold = -1.0;
    strict_f.mismatches_only = true;
    let mismatches = engine.sex_check(&strict_f, &cancel).unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].sample, "HG004");
}

#[test]
fn test_sex_check_aaf_threshold_changes_value() {
    let engine = trio_engine();
    let cancel = CancelToken::new();
    let loose = engine
        .sex_check(&SexCheckQuery::with_defaults(Assembly::Grch37), &cancel)
        .unwrap();
    let mut req = SexCheckQuery::with_defaults(Assembly::Grch37);
    req.aaf_threshold = 0.5;
    let tight = engine.sex_check(&req, &cancel).unwrap();
    // fewer sites enter the computation under the cutoff
    let sites = |recs: &[cohortdb_core::engine::SexCheckRecord], n: &str| {
        recs.iter().find(|r| r.sample == n).unwrap().n_sites
    };
    assert!(sites(&tight, "HG004") < sites(&loose, "HG004"));
}

#[test]
fn test_prs_scoring() {
    let engine = trio_engine();
    let req = PrsQuery {
        assembly: Assembly::Grch37,
        name: "afib".into(),
        cohort: Some("trio".into()),
        samples: Vec::new(),
        model: PrsModel::Additive,
    };
    let report = engine.prs(&req).unwrap();
    // one of the three score sites is absent from the dataset
    assert_eq!(report.cardinality, 2);
    assert_eq!(report.scores.len(), 3);
    let by_name = |n: &str| report.scores.iter().find(|s| s.sample == n).unwrap();
    // HG002: hom at 880238 (2 x 0.1) + het at 880390 (1 x 0.2)
    assert!((by_name("HG002").score - 0.4).abs() < 1e-12);
    assert_eq!(by_name("HG002").hethom_cardinality, 2);
    assert_eq!(by_name("HG002").ref_cardinality, 0);
    // parents: hom at 880238 only
    assert!((by_name("HG003").score - 0.2).abs() < 1e-12);
    assert_eq!(by_name("HG003").hethom_cardinality, 1);
    assert_eq!(by_name("HG003").ref_cardinality, 1);
}

#[test]
fn test_prs_models_and_edge_cases() {
    let engine = trio_engine();
    let mut req = PrsQuery {
        assembly: Assembly::Grch37,
        name: "afib".into(),
        cohort: None,
        samples: vec!["HG002".into()],
        model: PrsModel::Dominant,
    };
    let dom = engine.prs(&req).unwrap();
    // dominant: both carried sites score 1 each
    assert!((dom.scores[0].score - 0.3).abs() < 1e-12);

    req.model = PrsModel::Recessive;
    let rec = engine.prs(&req).unwrap();
    // recessive: only the hom site scores
    assert!((rec.scores[0].score - 0.1).abs() < 1e-12);

    // unknown score name: sentinel cardinality, no scores
    req.name = "no-such-score".into();
    let unknown = engine.prs(&req).unwrap();
    assert_eq!(unknown.cardinality, -1);
    assert!(unknown.scores.is_empty());

    // unknown samples: real cardinality, empty score list
    req.name = "afib".into();
    req.samples = vec!["NA12878".into()];
    let no_samples = engine.prs(&req).unwrap();
    assert_eq!(no_samples.cardinality, 2);
    assert!(no_samples.scores.is_empty());
}

#[test]
fn test_prs_model_flag_validation() {
    assert!(matches!(
        PrsModel::from_flags(true, true),
        Err(QueryError::InvalidArgument(_))
    ));
}

#[test]
fn test_inheritance_patterns() {
    let engine = trio_engine();
    let cancel = CancelToken::new();

    let de_novo = InheritanceQuery {
        assembly: Assembly::Grch37,
        trio: trio(),
        model: InheritanceModel::DeNovo,
        mode: ExecMode::Parallel,
    };
    let hits = engine.inheritance(&de_novo, &cancel).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].site.start, 880390);

    let recessive = InheritanceQuery {
        model: InheritanceModel::HomRecessive,
        ..de_novo.clone()
    };
    let hits = engine.inheritance(&recessive, &cancel).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].site.start, 900100);

    let dominant = InheritanceQuery {
        model: InheritanceModel::HetDominant(AffectedParent::Father),
        ..de_novo.clone()
    };
    let hits = engine.inheritance(&dominant, &cancel).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].site.start, 900200);

    // sequential mode returns the same variants
    let seq = InheritanceQuery {
        mode: ExecMode::Sequential,
        ..dominant.clone()
    };
    assert_eq!(engine.inheritance(&seq, &cancel).unwrap(), hits);

    // unknown trio member yields an empty result
    let bad_trio = InheritanceQuery {
        trio: Trio {
            mother: "nobody".into(),
            ..trio()
        },
        ..de_novo
    };
    assert!(engine.inheritance(&bad_trio, &cancel).unwrap().is_empty());
}
