//! Unit tests for the class hierarchy.
//!
//! This module contains tests for installation, linking, the
//! cycle/connectivity check, the subtype and least-upper-bound operators,
//! and inherited member resolution.

use std::rc::Rc;

use super::builtins::{basic_classes, BuiltinNames};
use super::hierarchy::ClassHierarchy;
use crate::ast::ast::{Attribute, ClassDef, Expr, Feature, Method};
use crate::ast::types::Ty;
use crate::environment::features::build_feature_tables;
use crate::errors::errors::Diagnostics;
use crate::intern::intern::{Interner, Symbol};
use crate::Position;

fn position(line: u32) -> Position {
    Position(line, Rc::new(String::from("test.lang")))
}

fn class_def(interner: &mut Interner, name: &str, parent: &str, line: u32) -> ClassDef {
    ClassDef {
        name: interner.intern(name),
        parent: Some(interner.intern(parent)),
        features: vec![],
        position: position(line),
    }
}

/// Installs the built-ins plus `classes` (name, parent) pairs, links and
/// runs the connectivity check.
fn setup(classes: &[(&str, &str)]) -> (Interner, ClassHierarchy, Diagnostics) {
    let mut interner = Interner::new();
    let names = BuiltinNames::new(&mut interner);
    let mut hierarchy = ClassHierarchy::new(names.object);
    let mut diagnostics = Diagnostics::new();

    for class in basic_classes(&names) {
        hierarchy.install(&class, &interner, &mut diagnostics);
    }
    for (line, (name, parent)) in classes.iter().enumerate() {
        let class = class_def(&mut interner, name, parent, line as u32 + 1);
        hierarchy.install(&class, &interner, &mut diagnostics);
    }
    hierarchy.link(&interner, &mut diagnostics);
    if diagnostics.is_empty() {
        hierarchy.check_connectivity(&interner, &mut diagnostics);
    }
    (interner, hierarchy, diagnostics)
}

fn named(interner: &mut Interner, name: &str) -> Ty {
    Ty::Named(interner.intern(name))
}

#[test]
fn test_install_duplicate_keeps_first_definition() {
    let mut interner = Interner::new();
    let names = BuiltinNames::new(&mut interner);
    let mut hierarchy = ClassHierarchy::new(names.object);
    let mut diagnostics = Diagnostics::new();

    let first = class_def(&mut interner, "A", "Object", 1);
    let second = class_def(&mut interner, "A", "Object", 9);
    hierarchy.install(&first, &interner, &mut diagnostics);
    hierarchy.install(&second, &interner, &mut diagnostics);

    assert_eq!(diagnostics.count(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.get_error_name(), "DuplicateClass");
    assert_eq!(diagnostic.get_position().0, 9);

    let info = hierarchy.get(first.name).unwrap();
    assert_eq!(info.position.0, 1);
}

#[test]
fn test_redefining_builtin_class_is_duplicate() {
    let (_, _, diagnostics) = setup(&[("Int", "Object")]);
    assert_eq!(diagnostics.count(), 1);
    assert_eq!(
        diagnostics.iter().next().unwrap().get_error_name(),
        "DuplicateClass"
    );
}

#[test]
fn test_link_reports_unknown_parent() {
    let (_, _, diagnostics) = setup(&[("A", "Missing")]);
    assert_eq!(diagnostics.count(), 1);
    assert_eq!(
        diagnostics.iter().next().unwrap().get_error_name(),
        "UnknownParent"
    );
}

#[test]
fn test_disconnected_cycle_reports_exactly_once() {
    let (_, _, diagnostics) = setup(&[("A", "B"), ("B", "A")]);
    assert_eq!(diagnostics.count(), 1);
    assert_eq!(
        diagnostics.iter().next().unwrap().get_error_name(),
        "InheritanceCycle"
    );
}

#[test]
fn test_well_formed_hierarchy_is_clean() {
    let (_, _, diagnostics) = setup(&[("A", "Object"), ("B", "A"), ("C", "A")]);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_subtype_is_reflexive() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A")]);
    for name in ["Object", "IO", "Int", "Bool", "String", "A", "B"] {
        let ty = named(&mut interner, name);
        assert!(hierarchy.is_subtype(ty, ty), "{name} <= {name}");
    }
}

#[test]
fn test_subtype_is_transitive() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A"), ("C", "B")]);
    let a = named(&mut interner, "A");
    let b = named(&mut interner, "B");
    let c = named(&mut interner, "C");
    let object = named(&mut interner, "Object");

    assert!(hierarchy.is_subtype(c, b));
    assert!(hierarchy.is_subtype(b, a));
    assert!(hierarchy.is_subtype(c, a));
    assert!(hierarchy.is_subtype(c, object));
}

#[test]
fn test_subtype_is_antisymmetric() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A")]);
    let a = named(&mut interner, "A");
    let b = named(&mut interner, "B");

    assert!(hierarchy.is_subtype(b, a));
    assert!(!hierarchy.is_subtype(a, b));
}

#[test]
fn test_error_recovery_type_conforms_both_ways() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object")]);
    let a = named(&mut interner, "A");

    assert!(hierarchy.is_subtype(Ty::Err, a));
    assert!(hierarchy.is_subtype(a, Ty::Err));
}

#[test]
fn test_no_type_conforms_to_everything() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object")]);
    let a = named(&mut interner, "A");

    assert!(hierarchy.is_subtype(Ty::NoType, a));
    assert!(!hierarchy.is_subtype(a, Ty::NoType));
}

#[test]
fn test_unknown_name_is_not_a_subtype() {
    let (mut interner, hierarchy, _) = setup(&[]);
    let unknown = named(&mut interner, "Phantom");
    let object = named(&mut interner, "Object");

    assert!(!hierarchy.is_subtype(unknown, object));
    assert!(hierarchy.is_subtype(unknown, unknown));
}

#[test]
fn test_lub_of_siblings_is_their_parent() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A"), ("C", "A")]);
    let a = named(&mut interner, "A");
    let b = named(&mut interner, "B");
    let c = named(&mut interner, "C");

    // The tightest bound, not just any common ancestor.
    assert_eq!(hierarchy.least_upper_bound(b, c), a);
    assert_eq!(hierarchy.least_upper_bound(c, b), a);
}

#[test]
fn test_lub_with_ancestor_is_the_ancestor() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A")]);
    let a = named(&mut interner, "A");
    let b = named(&mut interner, "B");
    let object = named(&mut interner, "Object");

    assert_eq!(hierarchy.least_upper_bound(b, a), a);
    assert_eq!(hierarchy.least_upper_bound(b, object), object);
}

#[test]
fn test_lub_of_unrelated_classes_is_the_root() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "Object")]);
    let a = named(&mut interner, "A");
    let b = named(&mut interner, "B");
    let int = named(&mut interner, "Int");
    let object = named(&mut interner, "Object");

    assert_eq!(hierarchy.least_upper_bound(a, b), object);
    assert_eq!(hierarchy.least_upper_bound(int, a), object);
}

#[test]
fn test_lub_result_is_a_common_ancestor() {
    let (mut interner, hierarchy, _) = setup(&[("A", "Object"), ("B", "A"), ("C", "B"), ("D", "A")]);
    let c = named(&mut interner, "C");
    let d = named(&mut interner, "D");

    let bound = hierarchy.least_upper_bound(c, d);
    assert!(hierarchy.is_subtype(c, bound));
    assert!(hierarchy.is_subtype(d, bound));
    assert_eq!(bound, named(&mut interner, "A"));
}

fn method_feature(interner: &mut Interner, name: &str, return_type: &str) -> Feature {
    Feature::Method(Method {
        name: interner.intern(name),
        formals: vec![],
        return_type: interner.intern(return_type),
        body: Expr::no_op(position(1)),
        position: position(1),
    })
}

fn attribute_feature(interner: &mut Interner, name: &str, declared_type: &str) -> Feature {
    Feature::Attribute(Attribute {
        name: interner.intern(name),
        declared_type: interner.intern(declared_type),
        init: Expr::no_op(position(1)),
        position: position(1),
    })
}

fn symbol(interner: &mut Interner, name: &str) -> Symbol {
    interner.intern(name)
}

#[test]
fn test_resolve_method_walks_the_parent_chain() {
    let mut interner = Interner::new();
    let names = BuiltinNames::new(&mut interner);
    let mut hierarchy = ClassHierarchy::new(names.object);
    let mut diagnostics = Diagnostics::new();

    let mut parent = class_def(&mut interner, "A", "Object", 1);
    parent.features.push(method_feature(&mut interner, "greet", "String"));
    let child = class_def(&mut interner, "B", "A", 2);

    let basics = basic_classes(&names);
    for class in basics.iter().chain([&parent, &child]) {
        hierarchy.install(class, &interner, &mut diagnostics);
    }
    hierarchy.link(&interner, &mut diagnostics);
    hierarchy.check_connectivity(&interner, &mut diagnostics);
    build_feature_tables(&mut hierarchy, &basics, &interner, &mut diagnostics);
    build_feature_tables(
        &mut hierarchy,
        &[parent.clone(), child.clone()],
        &interner,
        &mut diagnostics,
    );
    assert!(diagnostics.is_empty());

    let greet = symbol(&mut interner, "greet");
    let signature = hierarchy.resolve_method(child.name, greet).unwrap();
    assert_eq!(signature.return_type, names.string);
    assert_eq!(signature.arity(), 0);

    // Built-in methods are inherited everywhere.
    assert!(hierarchy.resolve_method(child.name, names.abort).is_some());
    assert!(hierarchy.resolve_method(names.string, names.concat).is_some());

    let missing = symbol(&mut interner, "missing");
    assert!(hierarchy.resolve_method(child.name, missing).is_none());
}

#[test]
fn test_resolve_attribute_walks_the_parent_chain() {
    let mut interner = Interner::new();
    let names = BuiltinNames::new(&mut interner);
    let mut hierarchy = ClassHierarchy::new(names.object);
    let mut diagnostics = Diagnostics::new();

    let mut parent = class_def(&mut interner, "A", "Object", 1);
    parent
        .features
        .push(attribute_feature(&mut interner, "count", "Int"));
    let child = class_def(&mut interner, "B", "A", 2);

    let basics = basic_classes(&names);
    for class in basics.iter().chain([&parent, &child]) {
        hierarchy.install(class, &interner, &mut diagnostics);
    }
    hierarchy.link(&interner, &mut diagnostics);
    hierarchy.check_connectivity(&interner, &mut diagnostics);
    build_feature_tables(&mut hierarchy, &basics, &interner, &mut diagnostics);
    build_feature_tables(
        &mut hierarchy,
        &[parent.clone(), child.clone()],
        &interner,
        &mut diagnostics,
    );
    assert!(diagnostics.is_empty());

    let count = symbol(&mut interner, "count");
    assert_eq!(hierarchy.resolve_attribute(child.name, count), Some(names.int));
    assert_eq!(hierarchy.resolve_attribute(names.object, count), None);
}
