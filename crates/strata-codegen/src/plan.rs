//! The generated API as data: which methods exist on which type, and how
//! each one encodes its operand. [`crate::emit`] renders a plan without
//! making any further decisions.

use quote::format_ident;
use strata_core::{CompareOp, Direction};
use syn::{Ident, Type, parse_quote};

use crate::column::{AssociationKind, ColumnDef};
use crate::error::{Element, ErrorKind, ProcessingError};
use crate::schema::SchemaDef;
use crate::types::option_inner;

/// Condition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    In,
    NotIn,
    Lt,
    Le,
    Gt,
    Ge,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Operators of value columns, booleans and text included.
    pub const VALUE: [Self; 8] = [
        Self::Eq,
        Self::NotEq,
        Self::In,
        Self::NotIn,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
    ];

    /// Identity operators of association columns.
    pub const IDENTITY: [Self; 4] = [Self::Eq, Self::NotEq, Self::In, Self::NotIn];

    /// Method name suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::NotEq => "not_eq",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    /// The binary comparison, for single-operand operators.
    #[must_use]
    pub const fn compare_op(self) -> Option<CompareOp> {
        match self {
            Self::Eq => Some(CompareOp::Eq),
            Self::NotEq => Some(CompareOp::NotEq),
            Self::Lt => Some(CompareOp::Lt),
            Self::Le => Some(CompareOp::Le),
            Self::Gt => Some(CompareOp::Gt),
            Self::Ge => Some(CompareOp::Ge),
            Self::In | Self::NotIn | Self::IsNull | Self::IsNotNull => None,
        }
    }
}

/// How a host value becomes a bind value.
#[derive(Debug, Clone)]
pub enum Encoding {
    /// `ToSqlValue` directly.
    Plain,
    /// Through `<adapter as TypeAdapter>::serialize`.
    Adapter(Type),
}

/// What a condition method takes.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A host value of the column's (non-optional) type.
    Value { ty: Type, encoding: Encoding },
    /// `&Target`; binds the target's primary key.
    Model { ty: Type, schema: Ident },
    /// `SingleAssociation<Target>`; binds its id.
    Reference { ty: Type },
    /// `IS NULL` / `IS NOT NULL`.
    Nothing,
}

/// One `<field>_<op>` method, generated on every query type.
#[derive(Debug, Clone)]
pub struct ConditionMethod {
    pub name: Ident,
    /// The `ColumnDef` constant on the schema.
    pub column: Ident,
    pub operator: Operator,
    pub operand: Operand,
}

/// One `order_by_<field>_<dir>` method, on relation and selector.
#[derive(Debug, Clone)]
pub struct OrderingMethod {
    pub name: Ident,
    pub column: Ident,
    pub direction: Direction,
}

/// What an updater setter takes.
#[derive(Debug, Clone)]
pub enum SetterInput {
    /// The declared field type.
    Value {
        ty: Type,
        optional: bool,
        encoding: Encoding,
    },
    /// `&Target`, or `Option<&Target>`; stores the target's primary key.
    Model {
        ty: Type,
        schema: Ident,
        optional: bool,
    },
    /// `SingleAssociation<Target>`, or its `Option`; stores the id.
    Reference { ty: Type, optional: bool },
}

/// One `set_<field>` method on the updater.
#[derive(Debug, Clone)]
pub struct SetterMethod {
    pub name: Ident,
    pub column: Ident,
    pub input: SetterInput,
}

/// Everything generated for one model.
#[derive(Debug, Clone)]
pub struct ModelPlan {
    pub model: Ident,
    pub schema: Ident,
    pub relation: Ident,
    pub selector: Ident,
    pub updater: Ident,
    pub deleter: Ident,
    pub conditions: Vec<ConditionMethod>,
    pub orderings: Vec<OrderingMethod>,
    pub setters: Vec<SetterMethod>,
}

impl ModelPlan {
    /// Names of all condition methods, in generation order.
    #[must_use]
    pub fn condition_names(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.name.to_string()).collect()
    }

    /// Names of all ordering methods, in generation order.
    #[must_use]
    pub fn ordering_names(&self) -> Vec<String> {
        self.orderings.iter().map(|o| o.name.to_string()).collect()
    }

    /// Names of all updater setters, in generation order.
    #[must_use]
    pub fn setter_names(&self) -> Vec<String> {
        self.setters.iter().map(|s| s.name.to_string()).collect()
    }
}

/// Operators a column supports.
#[must_use]
pub fn supported_operators(column: &ColumnDef) -> Vec<Operator> {
    let mut ops = match column.association {
        Some(_) => Operator::IDENTITY.to_vec(),
        None => Operator::VALUE.to_vec(),
    };
    if column.nullable_in_sql {
        ops.extend([Operator::IsNull, Operator::IsNotNull]);
    }
    ops
}

/// Plans the `<field>_<op>` method of `column`.
///
/// # Errors
///
/// Fails with a generation error when the column category does not support
/// `operator`.
pub fn condition(
    schema: &SchemaDef,
    column: &ColumnDef,
    operator: Operator,
) -> Result<ConditionMethod, ProcessingError> {
    if !supported_operators(column).contains(&operator) {
        let category = match column.association_kind() {
            Some(AssociationKind::Direct) => "direct association",
            Some(AssociationKind::Single) => "single association",
            None if matches!(operator, Operator::IsNull | Operator::IsNotNull) => {
                "non-nullable"
            }
            None => "value",
        };
        return Err(ProcessingError::new(
            ErrorKind::Generation,
            Element::field(schema.name(), column.method_stem(), column.location.clone()),
            format!(
                "operator `{}` is not supported on {category} column `{}`",
                operator.suffix(),
                column.name
            ),
        ));
    }

    let operand = match operator {
        Operator::IsNull | Operator::IsNotNull => Operand::Nothing,
        _ => match &column.association {
            Some(association) if association.kind == AssociationKind::Direct => Operand::Model {
                ty: association.target_ty.clone(),
                schema: association.target_schema(),
            },
            Some(association) => {
                let target = &association.target_ty;
                Operand::Reference {
                    ty: parse_quote!(::strata_core::SingleAssociation<#target>),
                }
            }
            None => Operand::Value {
                ty: option_inner(&column.ty).clone(),
                encoding: encoding(column),
            },
        },
    };

    Ok(ConditionMethod {
        name: format_ident!("{}_{}", column.method_stem(), operator.suffix()),
        column: column.const_ident(),
        operator,
        operand,
    })
}

fn encoding(column: &ColumnDef) -> Encoding {
    match &column.adapter {
        Some(adapter) => Encoding::Adapter(adapter.adapter.clone()),
        None => Encoding::Plain,
    }
}

fn setter(column: &ColumnDef) -> Vec<SetterMethod> {
    let stem = column.method_stem();
    let optional = column.host.is_option();
    let name = format_ident!("set_{stem}");
    let column_ident = column.const_ident();

    match &column.association {
        None => vec![SetterMethod {
            name,
            column: column_ident,
            input: SetterInput::Value {
                ty: column.ty.clone(),
                optional,
                encoding: encoding(column),
            },
        }],
        Some(association) => {
            let by_model = SetterMethod {
                name,
                column: column_ident.clone(),
                input: SetterInput::Model {
                    ty: association.target_ty.clone(),
                    schema: association.target_schema(),
                    optional,
                },
            };
            if association.kind == AssociationKind::Direct {
                return vec![by_model];
            }
            let target = &association.target_ty;
            vec![
                by_model,
                SetterMethod {
                    name: format_ident!("set_{stem}_reference"),
                    column: column_ident,
                    input: SetterInput::Reference {
                        ty: parse_quote!(::strata_core::SingleAssociation<#target>),
                        optional,
                    },
                },
            ]
        }
    }
}

/// Plans the whole API of one model.
///
/// # Errors
///
/// Returns every generation error of the model.
pub fn plan_model(schema: &SchemaDef) -> Result<ModelPlan, Vec<ProcessingError>> {
    let mut errors = Vec::new();
    let mut conditions = Vec::new();
    let mut orderings = Vec::new();
    let mut setters = Vec::new();

    for column in &schema.columns {
        for operator in supported_operators(column) {
            match condition(schema, column, operator) {
                Ok(method) => conditions.push(method),
                Err(err) => errors.push(err),
            }
        }

        if column.association.is_none() {
            let stem = column.method_stem();
            for (direction, suffix) in [(Direction::Asc, "asc"), (Direction::Desc, "desc")] {
                orderings.push(OrderingMethod {
                    name: format_ident!("order_by_{stem}_{suffix}"),
                    column: column.const_ident(),
                    direction,
                });
            }
        }

        if !column.auto_id {
            setters.extend(setter(column));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ModelPlan {
        model: schema.ident.clone(),
        schema: schema.schema_ident(),
        relation: schema.relation_ident(),
        selector: schema.selector_ident(),
        updater: schema.updater_ident(),
        deleter: schema.deleter_ident(),
        conditions,
        orderings,
        setters,
    })
}
