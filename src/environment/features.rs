use crate::ast::ast::{ClassDef, Feature};
use crate::errors::errors::{Diagnostics, SemantErrorKind};
use crate::hierarchy::hierarchy::{ClassHierarchy, MethodSig};
use crate::intern::intern::Interner;

/// Populates each class's own attribute and method tables from its feature
/// list.
///
/// Duplicate detection is same-class-only: an inherited member of the same
/// name is not a duplicate here. Duplicates are reported against the class
/// and the first declaration wins. A `ClassDef` whose name resolved to a
/// different (earlier) installed definition is skipped entirely, so a
/// duplicate class never pollutes the winner's tables.
pub fn build_feature_tables(
    hierarchy: &mut ClassHierarchy,
    classes: &[ClassDef],
    interner: &Interner,
    diagnostics: &mut Diagnostics,
) {
    for class in classes {
        let Some(info) = hierarchy.get_mut(class.name) else {
            continue;
        };
        if info.position != class.position {
            continue;
        }
        for feature in &class.features {
            match feature {
                Feature::Attribute(attribute) => {
                    if info.attributes.contains_key(&attribute.name) {
                        diagnostics.report(
                            SemantErrorKind::DuplicateAttribute {
                                class: interner.resolve(class.name).to_string(),
                                attribute: interner.resolve(attribute.name).to_string(),
                            },
                            class.position.clone(),
                        );
                    } else {
                        info.attributes
                            .insert(attribute.name, attribute.declared_type);
                    }
                }
                Feature::Method(method) => {
                    if info.methods.contains_key(&method.name) {
                        diagnostics.report(
                            SemantErrorKind::DuplicateMethod {
                                class: interner.resolve(class.name).to_string(),
                                method: interner.resolve(method.name).to_string(),
                            },
                            class.position.clone(),
                        );
                    } else {
                        info.methods.insert(method.name, MethodSig::of(method));
                    }
                }
            }
        }
    }
}
