use crate::ast::ast::Program;
use crate::environment::features::build_feature_tables;
use crate::errors::errors::Diagnostics;
use crate::hierarchy::builtins::{basic_classes, BuiltinNames};
use crate::hierarchy::hierarchy::ClassHierarchy;
use crate::intern::intern::Interner;
use crate::type_checker::type_checker::check_classes;

/// Runs semantic analysis over `program`, decorating every expression node
/// in place and returning the run's diagnostics.
///
/// The built-in classes are created here and processed ahead of the user
/// classes in every stage; the caller's tree is only touched through the
/// type slots, so running the analysis twice over the same tree produces
/// identical results.
///
/// A structural error in stage 1 (duplicate classes, missing parents, a
/// malformed inheritance graph, duplicate features) makes type resolution
/// meaningless, so stage 2 is skipped entirely. Within a stage nothing
/// short-circuits; diagnostics accumulate per class and per expression.
pub fn analyze(program: &mut Program, interner: &mut Interner) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let names = BuiltinNames::new(interner);
    let mut basics = basic_classes(&names);

    let mut hierarchy = ClassHierarchy::new(names.object);
    for class in basics.iter().chain(program.classes.iter()) {
        hierarchy.install(class, interner, &mut diagnostics);
    }

    let before_link = diagnostics.count();
    hierarchy.link(interner, &mut diagnostics);
    if diagnostics.count() == before_link {
        // A class whose parent is missing would be misreported as a cycle;
        // the connectivity check requires a complete adjacency.
        hierarchy.check_connectivity(interner, &mut diagnostics);
    }

    build_feature_tables(&mut hierarchy, &basics, interner, &mut diagnostics);
    build_feature_tables(&mut hierarchy, &program.classes, interner, &mut diagnostics);

    if !diagnostics.is_empty() {
        return diagnostics;
    }

    check_classes(&mut basics, &hierarchy, interner, &names, &mut diagnostics);
    check_classes(
        &mut program.classes,
        &hierarchy,
        interner,
        &names,
        &mut diagnostics,
    );
    diagnostics
}
