use std::rc::Rc;

use crate::ast::ast::{Attribute, ClassDef, Expr, Feature, Formal, Method};
use crate::intern::intern::{Interner, Symbol};
use crate::Position;

/// Interned handles for every fixed name the analyzer refers to: the five
/// reserved class names, their member names, and the special identifiers.
///
/// Built once per run from the run's interner, so the handles compare equal
/// to the same names wherever they appear in the user program.
#[derive(Debug, Clone)]
pub struct BuiltinNames {
    pub object: Symbol,
    pub io: Symbol,
    pub int: Symbol,
    pub boolean: Symbol,
    pub string: Symbol,

    pub self_name: Symbol,
    pub self_type: Symbol,

    pub abort: Symbol,
    pub type_name: Symbol,
    pub copy: Symbol,
    pub out_string: Symbol,
    pub out_int: Symbol,
    pub in_string: Symbol,
    pub in_int: Symbol,
    pub length: Symbol,
    pub concat: Symbol,
    pub substr: Symbol,

    pub val: Symbol,
    pub str_field: Symbol,
    pub prim_slot: Symbol,
    pub arg: Symbol,
    pub arg2: Symbol,
}

impl BuiltinNames {
    pub fn new(interner: &mut Interner) -> Self {
        BuiltinNames {
            object: interner.intern("Object"),
            io: interner.intern("IO"),
            int: interner.intern("Int"),
            boolean: interner.intern("Bool"),
            string: interner.intern("String"),

            self_name: interner.intern("self"),
            self_type: interner.intern("SELF_TYPE"),

            abort: interner.intern("abort"),
            type_name: interner.intern("type_name"),
            copy: interner.intern("copy"),
            out_string: interner.intern("out_string"),
            out_int: interner.intern("out_int"),
            in_string: interner.intern("in_string"),
            in_int: interner.intern("in_int"),
            length: interner.intern("length"),
            concat: interner.intern("concat"),
            substr: interner.intern("substr"),

            val: interner.intern("_val"),
            str_field: interner.intern("_str_field"),
            prim_slot: interner.intern("_prim_slot"),
            arg: interner.intern("arg"),
            arg2: interner.intern("arg2"),
        }
    }
}

fn builtin_position() -> Position {
    Position(0, Rc::new(String::from("<basic class>")))
}

fn method(name: Symbol, formals: Vec<(Symbol, Symbol)>, return_type: Symbol) -> Feature {
    let position = builtin_position();
    Feature::Method(Method {
        name,
        formals: formals
            .into_iter()
            .map(|(formal_name, declared_type)| Formal {
                name: formal_name,
                declared_type,
                position: builtin_position(),
            })
            .collect(),
        return_type,
        body: Expr::no_op(builtin_position()),
        position,
    })
}

fn attribute(name: Symbol, declared_type: Symbol) -> Feature {
    Feature::Attribute(Attribute {
        name,
        declared_type,
        init: Expr::no_op(builtin_position()),
        position: builtin_position(),
    })
}

/// The five built-in class definitions in their fixed installation order.
///
/// Their method bodies are empty (the runtime provides them), and their
/// `SELF_TYPE` returns and `_prim_slot` attributes are carried verbatim as
/// ordinary type names.
pub fn basic_classes(names: &BuiltinNames) -> Vec<ClassDef> {
    let object = ClassDef {
        name: names.object,
        parent: None,
        features: vec![
            method(names.abort, vec![], names.object),
            method(names.type_name, vec![], names.string),
            method(names.copy, vec![], names.self_type),
        ],
        position: builtin_position(),
    };

    let io = ClassDef {
        name: names.io,
        parent: Some(names.object),
        features: vec![
            method(names.out_string, vec![(names.arg, names.string)], names.self_type),
            method(names.out_int, vec![(names.arg, names.int)], names.self_type),
            method(names.in_string, vec![], names.string),
            method(names.in_int, vec![], names.int),
        ],
        position: builtin_position(),
    };

    let boolean = ClassDef {
        name: names.boolean,
        parent: Some(names.object),
        features: vec![attribute(names.val, names.prim_slot)],
        position: builtin_position(),
    };

    let int = ClassDef {
        name: names.int,
        parent: Some(names.object),
        features: vec![attribute(names.val, names.prim_slot)],
        position: builtin_position(),
    };

    let string = ClassDef {
        name: names.string,
        parent: Some(names.object),
        features: vec![
            attribute(names.val, names.int),
            attribute(names.str_field, names.prim_slot),
            method(names.length, vec![], names.int),
            method(names.concat, vec![(names.arg, names.string)], names.string),
            method(
                names.substr,
                vec![(names.arg, names.int), (names.arg2, names.int)],
                names.string,
            ),
        ],
        position: builtin_position(),
    };

    vec![object, io, boolean, int, string]
}
