// tests/plan.rs

//! Build plan construction tests over the sample recipe collection.

mod common;

use cairn::plan::{BuildPlan, BuildPlanBuilder, PlanOptions};
use cairn::registry::RecipeRegistry;

use common::{corpus_registry, resolve};

fn plan_for(registry: &RecipeRegistry, roots: &[&str]) -> BuildPlan {
    let graph = resolve(registry, roots).unwrap();
    BuildPlanBuilder::new(registry).build(&graph).unwrap()
}

#[test]
fn test_every_dependency_precedes_its_consumer() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["py-pydot", "panda"]);

    for node in &plan.nodes {
        let consumer_at = plan.position(&node.name).unwrap();
        for dep in &node.dependencies {
            let dep_at = plan.position(&dep.name).unwrap();
            assert!(
                dep_at < consumer_at,
                "{} must be planned before {}",
                dep.name,
                node.name
            );
        }
    }
}

#[test]
fn test_one_entry_per_package_name() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["py-pydot", "panda", "libbson@1.6.1"]);

    let mut names: Vec<&str> = plan.nodes.iter().map(|n| n.name.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_build_only_marks_tools_not_runtime_deps() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["py-pydot"]);

    assert!(!plan.node("py-pydot").unwrap().build_only);
    // Runtime closure: linked or run dependencies stay installed
    assert!(!plan.node("python").unwrap().build_only);
    assert!(!plan.node("py-pyparsing").unwrap().build_only);
    assert!(!plan.node("graphviz").unwrap().build_only);
    // Only needed to run setup.py
    assert!(plan.node("py-setuptools").unwrap().build_only);
}

#[test]
fn test_autoreconf_appears_only_for_broken_tarball() {
    let registry = corpus_registry();

    let plan = plan_for(&registry, &["libbson@1.6.1"]);
    let steps = &plan.node("libbson").unwrap().steps;
    assert_eq!(steps[0].to_string(), "autoreconf -fiv");

    let plan = plan_for(&registry, &["libbson@1.6.3"]);
    let steps = &plan.node("libbson").unwrap().steps;
    assert!(steps.iter().all(|s| s.program != "autoreconf"));
}

#[test]
fn test_gated_configure_args_follow_resolved_variants() {
    let registry = corpus_registry();

    let plan = plan_for(&registry, &["mpich"]);
    let configure = &plan.node("mpich").unwrap().steps[0];
    assert!(configure.args.contains(&"--enable-shared".to_string()));
    assert!(!configure.args.contains(&"--with-ibverbs".to_string()));

    let plan = plan_for(&registry, &["mpich ~shared fabrics=verbs"]);
    let configure = &plan.node("mpich").unwrap().steps[0];
    assert!(configure.args.contains(&"--disable-shared".to_string()));
    assert!(configure.args.contains(&"--with-ibverbs".to_string()));
}

#[test]
fn test_dependency_prefixes_exported_to_environment() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["py-pydot"]);

    let node = plan.node("py-pydot").unwrap();
    assert_eq!(
        node.env.get("CAIRN_DEP_PYTHON_PREFIX").map(String::as_str),
        Some("/opt/cairn/python-2.7.13")
    );
    assert!(node.env.contains_key("CAIRN_DEP_PY_SETUPTOOLS_PREFIX"));
    assert!(node.env.contains_key("CAIRN_DEP_GRAPHVIZ_PREFIX"));
}

#[test]
fn test_r_package_installs_into_library_tree() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["r-deoptimr"]);

    let node = plan.node("r-deoptimr").unwrap();
    assert_eq!(node.steps.len(), 1);
    assert_eq!(
        node.steps[0].to_string(),
        "R CMD INSTALL --library=/opt/cairn/r-deoptimr-1.0-8/rlib/R/library ."
    );
}

#[test]
fn test_sources_carry_urls_and_checksums() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["r-deoptimr"]);

    let source = plan.node("r-deoptimr").unwrap().source.as_ref().unwrap();
    assert_eq!(
        source.url,
        "https://cran.r-project.org/src/contrib/DEoptimR_1.0-8.tar.gz"
    );
    assert_eq!(
        source.checksum.as_deref(),
        Some("md5:c85836a504fbe4166e3c8eba0efe705d")
    );
}

#[test]
fn test_plan_options_change_prefix_and_jobs() {
    let registry = corpus_registry();
    let graph = resolve(&registry, &["cmake"]).unwrap();
    let options = PlanOptions {
        prefix_root: "/sw".to_string(),
        jobs: 8,
    };
    let plan = BuildPlanBuilder::with_options(&registry, options)
        .build(&graph)
        .unwrap();

    let node = plan.node("cmake").unwrap();
    assert_eq!(node.prefix, "/sw/cmake-3.7.2");
    assert_eq!(
        node.steps[0].to_string(),
        "./bootstrap --prefix=/sw/cmake-3.7.2 --parallel=8"
    );
}

#[test]
fn test_plan_serializes_for_the_executor() {
    let registry = corpus_registry();
    let plan = plan_for(&registry, &["panda"]);

    let json = serde_json::to_value(&plan).unwrap();
    assert!(json["generated_at"].is_string());

    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), plan.len());
    for node in nodes {
        assert!(node["name"].is_string());
        assert!(node["version"].is_string());
        assert!(node["prefix"].is_string());
        assert!(node["build_only"].is_boolean());
        assert!(node["steps"].is_array());
        assert!(node["env"].is_object());
    }

    let back: BuildPlan = serde_json::from_value(json).unwrap();
    assert_eq!(back, plan);
}

#[test]
fn test_plans_are_deterministic() {
    let registry = corpus_registry();
    let a = plan_for(&registry, &["py-pydot", "panda"]);
    let b = plan_for(&registry, &["py-pydot", "panda"]);
    assert_eq!(a.nodes, b.nodes);
}
