use crate::ast::ast::{ClassDef, Expr, ExprKind, Feature, Method};
use crate::ast::types::Ty;
use crate::environment::environment::ScopeStack;
use crate::errors::errors::{Diagnostics, SemantErrorKind};
use crate::hierarchy::builtins::BuiltinNames;
use crate::hierarchy::hierarchy::ClassHierarchy;
use crate::intern::intern::{Interner, Symbol};
use crate::Position;

/// The expression checker for one compilation run.
///
/// Carries the ambient context the rules need: the hierarchy, the class
/// currently being checked, and its stack of lexical frames. All of it is
/// explicit per-run state; nothing survives the run.
pub struct TypeChecker<'a> {
    hierarchy: &'a ClassHierarchy,
    interner: &'a Interner,
    names: &'a BuiltinNames,
    diagnostics: &'a mut Diagnostics,
    current_class: Symbol,
    scopes: ScopeStack,
}

/// Checks every class in order. Never short-circuits: each class and each
/// expression is visited even when earlier ones failed.
pub fn check_classes(
    classes: &mut [ClassDef],
    hierarchy: &ClassHierarchy,
    interner: &Interner,
    names: &BuiltinNames,
    diagnostics: &mut Diagnostics,
) {
    let mut checker = TypeChecker::new(hierarchy, interner, names, diagnostics);
    for class in classes.iter_mut() {
        checker.check_class(class);
    }
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        hierarchy: &'a ClassHierarchy,
        interner: &'a Interner,
        names: &'a BuiltinNames,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        let current_class = hierarchy.root();
        TypeChecker {
            hierarchy,
            interner,
            names,
            diagnostics,
            current_class,
            scopes: ScopeStack::new(),
        }
    }

    pub fn check_class(&mut self, class: &mut ClassDef) {
        self.current_class = class.name;
        self.scopes = ScopeStack::new();
        let class_position = class.position.clone();
        for feature in &mut class.features {
            match feature {
                Feature::Attribute(attribute) => {
                    // Annotated but not conformance-checked; an omitted
                    // initializer is a no-op resolving to the no-type
                    // sentinel.
                    self.check_expr(&mut attribute.init);
                }
                Feature::Method(method) => self.check_method(method, &class_position),
            }
        }
    }

    fn check_method(&mut self, method: &mut Method, class_position: &Position) {
        self.scopes.push_frame();
        for formal in &method.formals {
            self.scopes.bind(formal.name, Ty::Named(formal.declared_type));
        }
        let body_ty = self.check_expr(&mut method.body);
        self.scopes.pop_frame();

        let declared = Ty::Named(method.return_type);
        if !self.hierarchy.is_subtype(body_ty, declared) {
            self.report_mismatch(declared, body_ty, class_position.clone());
        }
    }

    /// Post-order visit: children are fully resolved before the parent rule
    /// applies, and the node's type slot is filled in before returning.
    pub fn check_expr(&mut self, expr: &mut Expr) -> Ty {
        let position = expr.position.clone();
        let ty = match &mut expr.kind {
            ExprKind::IntLit(_) => Ty::Named(self.names.int),
            ExprKind::BoolLit(_) => Ty::Named(self.names.boolean),
            ExprKind::StrLit(_) => Ty::Named(self.names.string),
            ExprKind::NoOp => Ty::NoType,

            ExprKind::Arith { lhs, rhs, .. } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if self.matches(lhs_ty, self.names.int) && self.matches(rhs_ty, self.names.int) {
                    Ty::Named(self.names.int)
                } else {
                    let received = if self.matches(lhs_ty, self.names.int) {
                        rhs_ty
                    } else {
                        lhs_ty
                    };
                    self.report_mismatch(Ty::Named(self.names.int), received, position);
                    Ty::Named(self.names.object)
                }
            }

            ExprKind::Compare { lhs, rhs, .. } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if !(self.matches(lhs_ty, self.names.int) && self.matches(rhs_ty, self.names.int)) {
                    let received = if self.matches(lhs_ty, self.names.int) {
                        rhs_ty
                    } else {
                        lhs_ty
                    };
                    self.report_mismatch(Ty::Named(self.names.int), received, position);
                }
                // A comparison is Bool even when its operands are not.
                Ty::Named(self.names.boolean)
            }

            ExprKind::Eq { lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                let involves_primitive = self.is_primitive(lhs_ty) || self.is_primitive(rhs_ty);
                if !lhs_ty.is_err() && !rhs_ty.is_err() && involves_primitive && lhs_ty != rhs_ty {
                    let left = self.describe(lhs_ty);
                    let right = self.describe(rhs_ty);
                    self.report(SemantErrorKind::IncomparableTypes { left, right }, position);
                }
                Ty::Named(self.names.boolean)
            }

            ExprKind::Neg(operand) => {
                let operand_ty = self.check_expr(operand);
                if self.matches(operand_ty, self.names.int) {
                    Ty::Named(self.names.int)
                } else {
                    self.report_mismatch(Ty::Named(self.names.int), operand_ty, position);
                    Ty::Named(self.names.object)
                }
            }

            ExprKind::Not(operand) => {
                let operand_ty = self.check_expr(operand);
                if self.matches(operand_ty, self.names.boolean) {
                    Ty::Named(self.names.boolean)
                } else {
                    self.report_mismatch(Ty::Named(self.names.boolean), operand_ty, position);
                    Ty::Named(self.names.object)
                }
            }

            ExprKind::Assign { target, value } => {
                let target = *target;
                let value_ty = self.check_expr(value);
                match self.resolve_identifier(target) {
                    Some(declared) => {
                        if self.hierarchy.is_subtype(value_ty, declared) {
                            value_ty
                        } else {
                            self.report_mismatch(declared, value_ty, position);
                            Ty::Named(self.names.object)
                        }
                    }
                    None => {
                        let identifier = self.interner.resolve(target).to_string();
                        self.report(SemantErrorKind::UnboundIdentifier { identifier }, position);
                        Ty::Named(self.names.object)
                    }
                }
            }

            ExprKind::Ident(name) => {
                let name = *name;
                if name == self.names.self_name {
                    // Never in the scope table; resolved structurally to the
                    // class currently being checked.
                    Ty::Named(self.current_class)
                } else {
                    match self.resolve_identifier(name) {
                        Some(ty) => ty,
                        None => {
                            let identifier = self.interner.resolve(name).to_string();
                            self.report(SemantErrorKind::UndeclaredIdentifier { identifier }, position);
                            Ty::Named(self.names.object)
                        }
                    }
                }
            }

            // No existence check on the named type.
            ExprKind::New(type_name) => Ty::Named(*type_name),

            ExprKind::IsVoid(operand) => {
                self.check_expr(operand);
                Ty::Named(self.names.boolean)
            }

            ExprKind::If {
                predicate,
                then_branch,
                else_branch,
            } => {
                let predicate_ty = self.check_expr(predicate);
                let then_ty = self.check_expr(then_branch);
                let else_ty = self.check_expr(else_branch);
                if self.matches(predicate_ty, self.names.boolean) {
                    self.hierarchy.least_upper_bound(then_ty, else_ty)
                } else {
                    // Both branches were still checked; their types are
                    // discarded.
                    self.report_mismatch(Ty::Named(self.names.boolean), predicate_ty, position);
                    Ty::Named(self.names.object)
                }
            }

            ExprKind::While { predicate, body } => {
                let predicate_ty = self.check_expr(predicate);
                self.check_expr(body);
                if !self.matches(predicate_ty, self.names.boolean) {
                    self.report_mismatch(Ty::Named(self.names.boolean), predicate_ty, position);
                }
                // A loop is Object no matter what.
                Ty::Named(self.names.object)
            }

            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                self.check_expr(scrutinee);
                let mut result: Option<Ty> = None;
                for branch in branches.iter_mut() {
                    self.scopes.push_frame();
                    self.scopes.bind(branch.name, Ty::Named(branch.declared_type));
                    let branch_ty = self.check_expr(&mut branch.body);
                    self.scopes.pop_frame();
                    result = Some(match result {
                        Some(seed) => self.hierarchy.least_upper_bound(seed, branch_ty),
                        None => branch_ty,
                    });
                }
                result.unwrap_or(Ty::Named(self.names.object))
            }

            ExprKind::Let {
                name,
                declared_type,
                init,
                body,
            } => {
                let name = *name;
                let declared = Ty::Named(*declared_type);
                let init_ty = self.check_expr(init);
                self.scopes.push_frame();
                self.scopes.bind(name, declared);
                let body_ty = self.check_expr(body);
                self.scopes.pop_frame();
                // The body was checked under the binding regardless of this
                // later validation.
                if self.hierarchy.is_subtype(init_ty, declared) {
                    body_ty
                } else {
                    self.report_mismatch(declared, init_ty, position);
                    Ty::Named(self.names.object)
                }
            }

            ExprKind::Block(body) => {
                let mut last = Ty::NoType;
                for statement in body.iter_mut() {
                    last = self.check_expr(statement);
                }
                last
            }

            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => {
                let method = *method;
                let receiver_ty = self.check_expr(receiver);
                let args = self.check_args(args);
                if receiver_ty.is_err() {
                    // Absorbing: a receiver that already failed is never
                    // reported again.
                    Ty::Err
                } else {
                    self.check_call(receiver_ty, method, &args, position)
                }
            }

            ExprKind::StaticDispatch {
                receiver,
                dispatch_type,
                method,
                args,
            } => {
                let dispatch_type = *dispatch_type;
                let method = *method;
                let receiver_ty = self.check_expr(receiver);
                let args = self.check_args(args);
                let dispatch_ty = Ty::Named(dispatch_type);
                let mut conforms = true;
                if !self.hierarchy.is_subtype(receiver_ty, dispatch_ty) {
                    self.report_mismatch(dispatch_ty, receiver_ty, position.clone());
                    conforms = false;
                }
                let result = self.check_call(dispatch_ty, method, &args, position);
                if conforms {
                    result
                } else {
                    Ty::Named(self.names.object)
                }
            }
        };
        expr.ty = Some(ty);
        ty
    }

    /// Checks every argument left-to-right, keeping each one's type and
    /// position for the call rule.
    fn check_args(&mut self, args: &mut [Expr]) -> Vec<(Ty, Position)> {
        args.iter_mut()
            .map(|arg| {
                let ty = self.check_expr(arg);
                (ty, arg.position.clone())
            })
            .collect()
    }

    /// The shared dynamic/static call rule: resolve the method on the
    /// dispatch type, then check arity and every in-range argument. Nothing
    /// short-circuits, so a call can report an arity mismatch and argument
    /// mismatches in the same pass; a call that reported anything resolves
    /// to Object.
    fn check_call(
        &mut self,
        dispatch_ty: Ty,
        method: Symbol,
        args: &[(Ty, Position)],
        position: Position,
    ) -> Ty {
        let resolved = match dispatch_ty.as_named() {
            Some(class) => self.hierarchy.resolve_method(class, method).cloned(),
            None => None,
        };
        let Some(signature) = resolved else {
            let method = self.interner.resolve(method).to_string();
            let receiver = self.describe(dispatch_ty);
            self.report(SemantErrorKind::UnresolvedMethod { method, receiver }, position);
            return Ty::Named(self.names.object);
        };

        let mut failed = false;
        if args.len() != signature.arity() {
            let method = self.interner.resolve(method).to_string();
            self.report(
                SemantErrorKind::ArityMismatch {
                    method,
                    expected: signature.arity(),
                    received: args.len(),
                },
                position,
            );
            failed = true;
        }
        for ((arg_ty, arg_position), (_, formal_type)) in args.iter().zip(signature.formals.iter()) {
            let declared = Ty::Named(*formal_type);
            if !self.hierarchy.is_subtype(*arg_ty, declared) {
                self.report_mismatch(declared, *arg_ty, arg_position.clone());
                failed = true;
            }
        }
        if failed {
            Ty::Named(self.names.object)
        } else {
            Ty::Named(signature.return_type)
        }
    }

    /// Resolves an identifier through the lexical frames, then the class's
    /// attribute chain. `self` is handled structurally by the caller and is
    /// never in either.
    fn resolve_identifier(&self, name: Symbol) -> Option<Ty> {
        if let Some(ty) = self.scopes.lookup(name) {
            return Some(ty);
        }
        self.hierarchy
            .resolve_attribute(self.current_class, name)
            .map(Ty::Named)
    }

    /// Whether `ty` satisfies an exact-type requirement. The error-recovery
    /// type satisfies every requirement.
    fn matches(&self, ty: Ty, expected: Symbol) -> bool {
        ty == Ty::Err || ty == Ty::Named(expected)
    }

    fn is_primitive(&self, ty: Ty) -> bool {
        ty == Ty::Named(self.names.int)
            || ty == Ty::Named(self.names.boolean)
            || ty == Ty::Named(self.names.string)
    }

    fn describe(&self, ty: Ty) -> String {
        ty.describe(self.interner).to_string()
    }

    fn report(&mut self, error_kind: SemantErrorKind, position: Position) {
        self.diagnostics.report(error_kind, position);
    }

    fn report_mismatch(&mut self, expected: Ty, received: Ty, position: Position) {
        let expected = self.describe(expected);
        let received = self.describe(received);
        self.diagnostics
            .report(SemantErrorKind::TypeMismatch { expected, received }, position);
    }
}
