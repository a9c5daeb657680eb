use crate::test_utils::{lower_select, render};
use rdf_streams_functions::projection::{ProjectionElement, ProjectionSource};
use rdf_streams_logical::{
    compile, AlgebraNodeKind, AlgebraTree, CompileError, ProcessorCapability,
    SequentialIdGenerator, UuidIdGenerator,
};
use rdf_streams_model::{
    NamedNode, NamedNodePattern, Side, TermPattern, TriplePattern, Variable,
};
use rustc_hash::FxHashSet;

const PREFIX: &str = "PREFIX ex: <http://example.com/>\n";

fn knows(subject: &str, object: &str) -> AlgebraNodeKind {
    AlgebraNodeKind::Pattern(TriplePattern {
        subject: TermPattern::Variable(Variable::new_unchecked(subject)),
        predicate: NamedNodePattern::NamedNode(NamedNode::new_unchecked(
            "http://example.com/knows",
        )),
        object: TermPattern::Variable(Variable::new_unchecked(object)),
    })
}

#[test]
fn test_compile_projected_join() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a ?c WHERE {{ ?a ex:knows ?b . ?b ex:knows ?c }}"
    ));

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    insta::assert_snapshot!(render(&compiled), @r"
    PROJECTION_0 (-) <- [JOIN_1]: Projection: ?a, ?c
    JOIN_1 (-) <- [SP_2, SP_3]: Join (natural): join_vars=[b] all_vars=[b, a, c]
    SP_2 (LEFT) <- []: StatementPattern: ?a <http://example.com/knows> ?b
    SP_3 (RIGHT) <- []: StatementPattern: ?b <http://example.com/knows> ?c
    ");
}

#[test]
fn test_compile_three_way_join() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a ?d WHERE {{ ?a ex:p ?b . ?b ex:q ?c . ?c ex:r ?d }}"
    ));

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    insta::assert_snapshot!(render(&compiled), @r"
    PROJECTION_0 (-) <- [JOIN_1]: Projection: ?a, ?d
    JOIN_1 (-) <- [JOIN_2, SP_5]: Join (natural): join_vars=[c] all_vars=[c, a, b, d]
    JOIN_2 (LEFT) <- [SP_3, SP_4]: Join (natural): join_vars=[b] all_vars=[b, a, c]
    SP_3 (LEFT) <- []: StatementPattern: ?a <http://example.com/p> ?b
    SP_4 (RIGHT) <- []: StatementPattern: ?b <http://example.com/q> ?c
    SP_5 (RIGHT) <- []: StatementPattern: ?c <http://example.com/r> ?d
    ");
}

#[test]
fn test_compile_optional() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a ?c WHERE {{ ?a ex:knows ?b OPTIONAL {{ ?b ex:likes ?c }} }}"
    ));

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    insta::assert_snapshot!(render(&compiled), @r"
    PROJECTION_0 (-) <- [JOIN_1]: Projection: ?a, ?c
    JOIN_1 (-) <- [SP_2, SP_3]: Join (left outer): join_vars=[b] all_vars=[b, a, c]
    SP_2 (LEFT) <- []: StatementPattern: ?a <http://example.com/knows> ?b
    SP_3 (RIGHT) <- []: StatementPattern: ?b <http://example.com/likes> ?c
    ");
}

#[test]
fn test_projection_folds_rebinding() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a (?b AS ?friend) WHERE {{ ?a ex:knows ?b }}"
    ));

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    insta::assert_snapshot!(render(&compiled), @r"
    PROJECTION_0 (-) <- [SP_1]: Projection: ?a, ?b AS ?friend
    SP_1 (-) <- []: StatementPattern: ?a <http://example.com/knows> ?b
    ");
}

#[test]
fn test_projection_upstream_is_rebinding_operand() {
    let mut tree = AlgebraTree::new();
    let left = tree.add(knows("a", "b")).unwrap();
    let right = tree.add(knows("b", "c")).unwrap();
    let join = tree
        .add(AlgebraNodeKind::NaturalJoin { left, right })
        .unwrap();
    let rebinding = tree
        .add(AlgebraNodeKind::Rebinding {
            inner: join,
            elements: vec![ProjectionElement::new(
                ProjectionSource::Binding("c".to_owned()),
                "friend",
            )],
        })
        .unwrap();
    tree.add(AlgebraNodeKind::Projection {
        inner: rebinding,
        variables: vec!["a".to_owned(), "friend".to_owned()],
    })
    .unwrap();

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    let projection = compiled.root().unwrap();
    assert_eq!(projection.upstream_nodes(), [join]);
    assert!(compiled.id_of(rebinding).is_none());
    assert_eq!(compiled.entries().len(), 4);
}

#[test]
fn test_structurally_equal_operands_get_distinct_ids_and_sides() {
    let mut tree = AlgebraTree::new();
    let left = tree.add(knows("a", "b")).unwrap();
    let right = tree.add(knows("a", "b")).unwrap();
    tree.add(AlgebraNodeKind::NaturalJoin { left, right })
        .unwrap();

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    let left_entry = &compiled.entries()[1];
    let right_entry = &compiled.entries()[2];
    assert_eq!(left_entry.node(), left);
    assert_eq!(left_entry.side(), Some(Side::Left));
    assert_eq!(right_entry.node(), right);
    assert_eq!(right_entry.side(), Some(Side::Right));
    assert_ne!(left_entry.id(), right_entry.id());
}

#[test]
fn test_ids_are_bijective() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT * WHERE {{ ?a ex:p ?b . ?b ex:q ?c OPTIONAL {{ ?c ex:r ?d }} }}"
    ));

    let compiled = compile(&tree, &mut UuidIdGenerator).unwrap();

    let ids: FxHashSet<_> = compiled.entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), compiled.entries().len());
    assert_eq!(compiled.ids().len(), compiled.entries().len());
    for entry in compiled.entries() {
        assert_eq!(compiled.id_of(entry.node()), Some(entry.id()));
        assert!(entry.id().starts_with(entry.capability().stage_kind().prefix()));
    }
}

#[test]
fn test_independent_compilations_are_isomorphic() {
    let query = format!("{PREFIX}SELECT ?a ?c WHERE {{ ?a ex:knows ?b . ?b ex:knows ?c }}");
    let tree = lower_select(&query);

    let first = compile(&tree, &mut UuidIdGenerator).unwrap();
    let second = compile(&tree, &mut UuidIdGenerator).unwrap();

    assert_eq!(first.entries().len(), second.entries().len());
    for (a, b) in first.entries().iter().zip(second.entries()) {
        assert_eq!(a.node(), b.node());
        assert_eq!(a.side(), b.side());
        assert_eq!(a.capability(), b.capability());
        assert_eq!(a.upstream_nodes(), b.upstream_nodes());
        assert_ne!(a.id(), b.id());
    }
}

#[test]
fn test_blank_nodes_join_as_anonymous_variables() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a ?c WHERE {{ ?a ex:p _:x . _:x ex:q ?c }}"
    ));

    let compiled = compile(&tree, &mut SequentialIdGenerator::new()).unwrap();

    let ProcessorCapability::Join { keys, .. } = compiled.entries()[1].capability() else {
        panic!("Expected a join stage");
    };
    assert_eq!(keys.join_vars().len(), 1);
    assert!(keys.join_vars()[0].starts_with("_anon_"));
}

#[test]
fn test_filter_is_unsupported() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a WHERE {{ ?a ex:age ?age FILTER(?age > 18) }}"
    ));

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    let Err(CompileError::UnsupportedOperator { node, operator }) = result else {
        panic!("Expected an unsupported operator, got {result:?}");
    };
    assert_eq!(operator, "Filter");
    assert!(matches!(tree[node].kind(), AlgebraNodeKind::Filter { .. }));
}

#[test]
fn test_union_is_unsupported() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a WHERE {{ {{ ?a ex:p ?b }} UNION {{ ?a ex:q ?b }} }}"
    ));

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    assert!(matches!(
        result,
        Err(CompileError::UnsupportedOperator {
            operator: "Union",
            ..
        })
    ));
}

#[test]
fn test_optional_with_filter_is_unsupported() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?a WHERE {{ ?a ex:p ?b OPTIONAL {{ ?b ex:q ?c FILTER(?c = 1) }} }}"
    ));

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    assert!(matches!(
        result,
        Err(CompileError::UnsupportedOperator {
            operator: "LeftOuterJoin with filter",
            ..
        })
    ));
}

#[test]
fn test_rebinding_outside_projection_is_unsupported() {
    let mut tree = AlgebraTree::new();
    let pattern = tree.add(knows("a", "b")).unwrap();
    let rebinding = tree
        .add(AlgebraNodeKind::Rebinding {
            inner: pattern,
            elements: vec![ProjectionElement::new(
                ProjectionSource::Binding("a".to_owned()),
                "x",
            )],
        })
        .unwrap();

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    assert_eq!(
        result,
        Err(CompileError::UnsupportedOperator {
            node: rebinding,
            operator: "Rebinding",
        })
    );
}

#[test]
fn test_nested_rebinding_is_unsupported() {
    let mut tree = AlgebraTree::new();
    let pattern = tree.add(knows("a", "b")).unwrap();
    let inner = tree
        .add(AlgebraNodeKind::Rebinding {
            inner: pattern,
            elements: vec![ProjectionElement::new(
                ProjectionSource::Binding("a".to_owned()),
                "x",
            )],
        })
        .unwrap();
    let outer = tree
        .add(AlgebraNodeKind::Rebinding {
            inner,
            elements: vec![ProjectionElement::new(
                ProjectionSource::Binding("x".to_owned()),
                "y",
            )],
        })
        .unwrap();
    tree.add(AlgebraNodeKind::Projection {
        inner: outer,
        variables: vec!["y".to_owned()],
    })
    .unwrap();

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    assert_eq!(
        result,
        Err(CompileError::UnsupportedOperator {
            node: inner,
            operator: "Rebinding",
        })
    );
}

#[test]
fn test_computed_bind_is_unsupported() {
    let tree = lower_select(&format!(
        "{PREFIX}SELECT ?x WHERE {{ ?a ex:age ?age BIND(?age + 1 AS ?x) }}"
    ));

    let result = compile(&tree, &mut SequentialIdGenerator::new());

    assert!(matches!(
        result,
        Err(CompileError::UnsupportedOperator {
            operator: "Extend with a computed expression",
            ..
        })
    ));
}
