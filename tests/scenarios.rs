use assert2::{check, let_assert};
use nodepatch::{
    Node, Patch, PatchContext, PatchError, Spath, SuffixResolver, Verb, apply, apply_all,
    condition::{Condition, ConditionPath},
    config::load_from_str,
    resolve::find_matches,
};

fn doc(yaml: &str) -> Node {
    Node::from_yaml_str(yaml).unwrap()
}

fn path(p: &str) -> Spath {
    p.try_into().unwrap()
}

fn value(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn added_value_can_be_read_back() {
    let cases = [
        ("{}", "metadata.labels.app", "web"),
        ("spec: {}\n", "spec.containers.0.name", "nginx"),
        ("spec:\n  template: ~\n", "spec.template.replicas", "3"),
        ("a.b: {}\n", "a\\.b.c", "true"),
    ];

    for (input, target, raw) in cases {
        let mut doc = doc(input);
        let patch = Patch::new(Verb::Add, path(target)).with_value(value(raw));

        apply(&mut doc, &patch, &PatchContext::new()).unwrap();

        let_assert!(Ok(matches) = find_matches(&doc, target));
        check!(matches.len() == 1, "no match for {target} after add");
        let expected = doc_value(raw);
        check!(doc.get(&matches[0]).unwrap().same_value(&expected), "wrong value at {target}");
    }
}

fn doc_value(raw: &str) -> Node {
    Node::from_yaml_str(raw).unwrap()
}

#[test]
fn replace_twice_equals_replace_once() {
    let patch =
        Patch::new(Verb::Replace, path("spec.template.metadata")).with_value(value("name: web"));
    let mut once = doc("spec:\n  template:\n    metadata:\n      name: old\n      uid: 1\n");
    apply(&mut once, &patch, &PatchContext::new()).unwrap();

    let mut twice = once.clone();
    apply(&mut twice, &patch, &PatchContext::new()).unwrap();

    check!(once == twice);
    check!(once == doc("spec:\n  template:\n    metadata:\n      name: web\n"));
}

#[test]
fn removed_paths_match_nothing() {
    let targets = ["spec.paused", "spec.args.0", "metadata"];

    for target in targets {
        let mut doc = doc("metadata:\n  name: a\nspec:\n  paused: true\n  args: [x, y]\n");

        apply(&mut doc, &Patch::new(Verb::Remove, path(target)), &PatchContext::new()).unwrap();

        if target == "spec.args.0" {
            check!(doc.get(&path("spec.args")).unwrap().same_value(&self::doc("[y]")));
        } else {
            let_assert!(Ok(matches) = find_matches(&doc, target));
            check!(matches.is_empty(), "{target} still present");
        }
    }
}

#[test]
fn failing_condition_leaves_document_untouched() {
    let input = "kind: ConfigMap\ndata:\n  key: value\n";
    let not_a_secret = Condition::new(ConditionPath::Absolute(path("kind"))).equal("Secret");
    let patches = [
        Patch::new(Verb::Add, path("data.extra")).with_value("x"),
        Patch::new(Verb::Replace, path("data.key")).with_value("y"),
        Patch::new(Verb::Remove, path("data")),
        Patch::new(Verb::CopyFromObject, path("data.key")),
        Patch::new(Verb::CopyFromObject, path("data.copied")),
        Patch::new(Verb::RewriteName, path("data.key")),
        Patch::new(Verb::RewriteLabelSelector, path("data")),
        Patch::new(Verb::RewriteLabelExpressionsSelector, path("data")),
    ];
    let source = doc("data:\n  key: other\n  copied: new\n");
    let resolver = SuffixResolver::new("ns");
    let ctx = PatchContext::new().with_source(&source).with_resolver(&resolver);

    for patch in patches {
        let mut doc = doc(input);

        let verb = patch.op;
        let patch = patch.with_condition(not_a_secret.clone());

        let_assert!(Ok(()) = apply(&mut doc, &patch, &ctx));
        check!(doc == self::doc(input), "{verb} changed the document");
    }
}

#[test]
fn copy_name_into_empty_document() {
    let source = doc("metadata:\n  name: a\n");
    let mut target = doc("{}");
    let ctx = PatchContext::new().with_source(&source);

    apply(&mut target, &Patch::new(Verb::CopyFromObject, path("metadata.name")), &ctx).unwrap();

    check!(target == doc("metadata:\n  name: a\n"));
}

#[test]
fn label_selector_rewrite_keeps_unrelated_keys() {
    let mut doc = doc("spec:\n  type: ClusterIP\n  selector:\n    app: foo\n  ports: [80]\n");
    let resolver = SuffixResolver::new("ns");
    let ctx = PatchContext::new().with_resolver(&resolver);

    apply(&mut doc, &Patch::new(Verb::RewriteLabelSelector, path("spec.selector")), &ctx).unwrap();

    check!(
        doc == self::doc(
            "spec:\n  type: ClusterIP\n  selector:\n    app: foo-x-ns\n  ports: [80]\n"
        )
    );
}

#[test]
fn parent_condition_selects_matching_sibling() {
    let config = load_from_str(
        r#"
patches:
  - op: rewriteName
    path: spec.volumes.0.name
    conditions:
      - path: ..kind
        equal: secret
  - op: rewriteName
    path: spec.volumes.1.name
    conditions:
      - path: ..kind
        equal: secret
"#,
    )
    .unwrap();
    let mut doc = doc(concat!(
        "spec:\n  volumes:\n",
        "    - kind: secret\n      name: creds\n",
        "    - kind: emptyDir\n      name: tmp\n",
    ));
    let resolver = SuffixResolver::new("team").with_suffix("prod");

    apply_all(&mut doc, &config.patches, &PatchContext::new().with_resolver(&resolver)).unwrap();

    check!(
        doc == self::doc(concat!(
            "spec:\n  volumes:\n",
            "    - kind: secret\n      name: creds-x-team-x-prod\n",
            "    - kind: emptyDir\n      name: tmp\n",
        ))
    );
}

#[test]
fn config_driven_patch_list() {
    let config = load_from_str(
        r#"
patches:
  - op: copyFromObject
    path: status.observedReplicas
    fromPath: spec.replicas
  - op: add
    path: metadata.annotations
    value:
      synced: "true"
  - op: rewriteLabelExpressionsSelector
    path: spec.selector
  - op: remove
    path: spec.paused
    conditions:
      - path: spec.paused
        equal: false
"#,
    )
    .unwrap();
    let source = doc("spec:\n  replicas: 2\n");
    let resolver = SuffixResolver::new("ns");
    let ctx = PatchContext::new().with_source(&source).with_resolver(&resolver);
    let mut doc = doc(
        r#"
metadata:
  name: web
spec:
  paused: false
  selector:
    matchLabels:
      app: web
"#,
    );

    apply_all(&mut doc, &config.patches, &ctx).unwrap();

    check!(
        doc == self::doc(
            r#"
metadata:
  name: web
  annotations:
    synced: "true"
spec:
  selector:
    matchLabels:
      app: web-x-ns
status:
  observedReplicas: 2
"#
        )
    );
}

#[test]
fn errors_name_the_failing_patch() {
    let patches = vec![
        Patch::new(Verb::Add, path("spec.replicas.min")).with_value(1),
        Patch::new(Verb::Remove, path("spec")),
    ];
    let mut doc = doc("spec:\n  replicas: 3\n");

    let_assert!(Err(error) = apply_all(&mut doc, &patches, &PatchContext::new()));

    check!(error.index == 0);
    check!(error.path == path("spec.replicas.min"));
    let_assert!(PatchError::ResolveError(_) = error.source);
    check!(doc == self::doc("spec:\n  replicas: 3\n"));
}
