use super::{
    Associativity, DataSource, DataSourceKind, FunctionCategory, FunctionSpec, MethodArgKind,
    MethodSpec, OperatorKind, OperatorSpec, ReturnKind,
};

const SALE_PROPERTIES: &[&str] = &[
    "Id",
    "Amount",
    "SaleAmount",
    "Quantity",
    "ProductId",
    "CategoryId",
    "CustomerId",
    "CreatedBy",
    "CreatedDate",
    "Region",
    "Status",
    "Discount",
    "Margin",
];

pub fn standard_data_sources() -> Vec<DataSource> {
    use DataSourceKind::*;
    vec![
        DataSource::new("sale", "Current Sale", Object, SALE_PROPERTIES),
        DataSource::new(
            "user",
            "Sales Representative",
            Object,
            &[
                "Id",
                "Name",
                "Role",
                "Department",
                "ManagerId",
                "TeamId",
                "HireDate",
                "Level",
                "Target",
            ],
        ),
        DataSource::new(
            "context",
            "Period Context",
            Object,
            &[
                "Target",
                "Period",
                "Year",
                "Quarter",
                "Month",
                "CommissionRate",
                "BonusPool",
                "Today",
            ],
        ),
        DataSource::new(
            "customer",
            "Customer",
            Object,
            &["Id", "Name", "Segment", "Region", "IsNew", "SignupDate"],
        ),
        DataSource::new("allSales", "All Sales", Collection, SALE_PROPERTIES),
        DataSource::new("userSales", "Sales by Current User", Collection, SALE_PROPERTIES),
        DataSource::new(
            "teamMembers",
            "Team Members",
            Collection,
            &["Id", "Name", "Role", "Target", "Achieved"],
        ),
        DataSource::new(
            "products",
            "Products",
            Collection,
            &["Id", "Name", "Category", "Price", "Margin", "IsPromoted"],
        ),
    ]
}

macro_rules! operators {
    ( $( ($id:expr, $kind:ident, $prec:expr, $assoc:ident, $arity:expr) ),* $(,)? ) => {
        pub fn standard_operators() -> Vec<OperatorSpec> {
            vec![
                $( OperatorSpec {
                    id: $id,
                    kind: OperatorKind::$kind,
                    precedence: $prec,
                    associativity: Associativity::$assoc,
                    arity: $arity,
                }, )*
            ]
        }
    };
}

operators! {
    ("!", Logic, 1, Right, 1),
    ("-", Arithmetic, 1, Right, 1),
    ("**", Arithmetic, 2, Right, 2),
    ("*", Arithmetic, 3, Left, 2),
    ("/", Arithmetic, 3, Left, 2),
    ("%", Arithmetic, 3, Left, 2),
    ("+", Arithmetic, 4, Left, 2),
    ("-", Arithmetic, 4, Left, 2),
    ("<", Comparison, 5, Left, 2),
    ("<=", Comparison, 5, Left, 2),
    (">", Comparison, 5, Left, 2),
    (">=", Comparison, 5, Left, 2),
    ("==", Comparison, 6, Left, 2),
    ("!=", Comparison, 6, Left, 2),
    ("===", Comparison, 6, Left, 2),
    ("!==", Comparison, 6, Left, 2),
    ("&&", Logic, 7, Left, 2),
    ("||", Logic, 8, Left, 2),
    ("?:", Logic, 9, Right, 3),
}

pub(super) const TERNARY: OperatorSpec = OperatorSpec {
    id: "?:",
    kind: OperatorKind::Logic,
    precedence: 9,
    associativity: Associativity::Right,
    arity: 3,
};

macro_rules! functions {
    ( $( ($id:expr, $cat:ident, $arity:expr, $ret:ident) ),* $(,)? ) => {
        pub fn standard_functions() -> Vec<FunctionSpec> {
            vec![
                $( FunctionSpec {
                    id: $id,
                    category: FunctionCategory::$cat,
                    arity: $arity,
                    returns: ReturnKind::$ret,
                }, )*
            ]
        }
    };
}

functions! {
    ("Math.min", Math, 2, Number),
    ("Math.max", Math, 2, Number),
    ("Math.abs", Math, 1, Number),
    ("Math.round", Math, 1, Number),
    ("Math.floor", Math, 1, Number),
    ("Math.ceil", Math, 1, Number),
    ("Math.pow", Math, 2, Number),
    ("Math.sqrt", Math, 1, Number),
    ("Date.year", Date, 1, Number),
    ("Date.month", Date, 1, Number),
    ("Date.day", Date, 1, Number),
    ("Date.quarter", Date, 1, Number),
    ("Date.daysBetween", Date, 2, Number),
    ("Date.addDays", Date, 2, Date),
    ("String.length", String, 1, Number),
    ("String.upper", String, 1, String),
    ("String.lower", String, 1, String),
    ("String.contains", String, 2, Boolean),
    ("String.startsWith", String, 2, Boolean),
    ("String.concat", String, 2, String),
}

macro_rules! methods {
    ( $( ($id:expr, $arg:ident, $ret:ident) ),* $(,)? ) => {
        pub fn standard_methods() -> Vec<MethodSpec> {
            vec![
                $( MethodSpec {
                    id: $id,
                    arity: if matches!(MethodArgKind::$arg, MethodArgKind::None) { 0 } else { 1 },
                    argument: MethodArgKind::$arg,
                    returns: ReturnKind::$ret,
                }, )*
            ]
        }
    };
}

methods! {
    ("where", Lambda, Collection),
    ("sum", Lambda, Number),
    ("average", Lambda, Number),
    ("min", Lambda, Number),
    ("max", Lambda, Number),
    ("count", None, Number),
    ("any", Lambda, Boolean),
    ("all", Lambda, Boolean),
    ("first", None, Record),
    ("last", None, Record),
    ("groupBy", Lambda, Collection),
    ("orderBy", Lambda, Collection),
    ("orderByDescending", Lambda, Collection),
    ("distinct", None, Collection),
    ("take", Value, Collection),
    ("skip", Value, Collection),
}
