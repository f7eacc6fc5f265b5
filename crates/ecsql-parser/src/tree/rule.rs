//! The rule-tag vocabulary.
//!
//! Every interior node carries the tag of the nonterminal that produced it.
//! Downstream binding and planning dispatch on these tags, so the names are
//! part of the public contract.

use std::fmt;

use serde::{Serialize, Serializer};

macro_rules! rule_tags {
    ($($variant:ident => $name:literal,)*) => {
        /// Identifies the grammar construct an interior node was built for.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RuleTag {
            $($variant,)*
        }

        impl RuleTag {
            /// Every tag, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The stable snake_case name of the tag.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Looks a tag up by its snake_case name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

rule_tags! {
    // Statements
    Pragma => "pragma",
    PragmaSet => "pragma_set",
    OptPragmaSet => "opt_pragma_set",
    PragmaFor => "pragma_for",
    OptPragmaFor => "opt_pragma_for",
    SelectStatement => "select_statement",
    SingleSelectStatement => "single_select_statement",
    All => "all",
    InsertStatement => "insert_statement",
    UpdateStatementSearched => "update_statement_searched",
    DeleteStatementSearched => "delete_statement_searched",
    AssignmentCommalist => "assignment_commalist",
    Assignment => "assignment",
    ValuesOrQuerySpec => "values_or_query_spec",
    RowValueConstructorCommalist => "row_value_constructor_commalist",
    ColumnRefCommalistClause => "column_ref_commalist_clause",
    OptColumnRefCommalist => "opt_column_ref_commalist",
    ColumnRefCommalist => "column_ref_commalist",

    // Common table expressions
    Cte => "cte",
    OptRecursive => "opt_recursive",
    CteBlockList => "cte_block_list",
    CteTableName => "cte_table_name",
    ColumnCommalistClause => "column_commalist_clause",
    OptColumnCommalist => "opt_column_commalist",
    ColumnCommalist => "column_commalist",

    // Select list and table expression
    Selection => "selection",
    OptAllDistinct => "opt_all_distinct",
    ScalarExpCommalist => "scalar_exp_commalist",
    DerivedColumn => "derived_column",
    AsClause => "as_clause",
    OptAsClause => "opt_as_clause",
    OptAs => "opt_as",
    TableExp => "table_exp",
    FromClause => "from_clause",
    OptFromClause => "opt_from_clause",
    WhereClause => "where_clause",
    OptWhereClause => "opt_where_clause",
    GroupByClause => "group_by_clause",
    OptGroupByClause => "opt_group_by_clause",
    ValueExpCommalist => "value_exp_commalist",
    HavingClause => "having_clause",
    OptHavingClause => "opt_having_clause",
    WindowClause => "window_clause",
    OptWindowClause => "opt_window_clause",
    WindowDefinitionList => "window_definition_list",
    WindowDefinition => "window_definition",
    OrderByClause => "order_by_clause",
    OptOrderByClause => "opt_order_by_clause",
    OrderingSpecCommalist => "ordering_spec_commalist",
    OrderingSpec => "ordering_spec",
    OptAscDesc => "opt_asc_desc",
    LimitOffsetClause => "limit_offset_clause",
    OptLimitOffsetClause => "opt_limit_offset_clause",
    OffsetClause => "offset_clause",
    OptOffset => "opt_offset",
    EcsqloptionsClause => "ecsqloptions_clause",
    OptEcsqloptionsClause => "opt_ecsqloptions_clause",
    EcsqloptionsList => "ecsqloptions_list",
    Ecsqloption => "ecsqloption",

    // FROM list
    TableRefCommalist => "table_ref_commalist",
    TableRef => "table_ref",
    SubqueryRef => "subquery_ref",
    Subquery => "subquery",
    OptDisqualifyPolymorphicConstraint => "opt_disqualify_polymorphic_constraint",
    OptOnly => "opt_only",
    QualifiedClassName => "qualified_class_name",
    TableName => "table_name",
    RangeVariable => "range_variable",
    OptRangeVariable => "opt_range_variable",
    CrossUnion => "cross_union",
    QualifiedJoin => "qualified_join",
    EcrelationshipJoin => "ecrelationship_join",
    JoinType => "join_type",
    OuterJoinType => "outer_join_type",
    JoinCondition => "join_condition",
    NamedColumnsJoin => "named_columns_join",
    OpRelationshipDirection => "op_relationship_direction",

    // Search conditions and predicates
    SearchCondition => "search_condition",
    BooleanTerm => "boolean_term",
    BooleanFactor => "boolean_factor",
    BooleanTest => "boolean_test",
    BooleanPrimary => "boolean_primary",
    UnaryPredicate => "unary_predicate",
    SqlNot => "sql_not",
    ComparisonPredicate => "comparison_predicate",
    ComparisonPredicatePart2 => "comparison_predicate_part_2",
    Comparison => "comparison",
    AllOrAnyPredicate => "all_or_any_predicate",
    QuantifiedComparisonPredicatePart2 => "quantified_comparison_predicate_part_2",
    BetweenPredicate => "between_predicate",
    BetweenPredicatePart2 => "between_predicate_part_2",
    LikePredicate => "like_predicate",
    CharacterLikePredicatePart2 => "character_like_predicate_part_2",
    OtherLikePredicatePart2 => "other_like_predicate_part_2",
    EscapeClause => "escape_clause",
    OptEscape => "opt_escape",
    TestForNull => "test_for_null",
    NullPredicatePart2 => "null_predicate_part_2",
    InPredicate => "in_predicate",
    InPredicatePart2 => "in_predicate_part_2",
    InPredicateValue => "in_predicate_value",
    ExistenceTest => "existence_test",
    UniqueTest => "unique_test",
    RtreematchPredicate => "rtreematch_predicate",
    RtreematchPredicatePart2 => "rtreematch_predicate_part_2",
    TypePredicate => "type_predicate",
    TypeList => "type_list",
    TypeListItem => "type_list_item",

    // Scalar expressions
    NumValueExp => "num_value_exp",
    Term => "term",
    Factor => "factor",
    Concatenation => "concatenation",
    ValueExpPrimary => "value_exp_primary",
    ColumnRef => "column_ref",
    PropertyPath => "property_path",
    PropertyPathEntry => "property_path_entry",
    OptColumnArrayIdx => "opt_column_array_idx",
    ExtractValue => "extract_value",
    OptExtractValue => "opt_extract_value",
    OptOptionalProp => "opt_optional_prop",
    Parameter => "parameter",
    DatetimeValueFct => "datetime_value_fct",
    FctSpec => "fct_spec",
    FunctionArgsCommalist => "function_args_commalist",
    AggregateFct => "aggregate_fct",
    IifSpec => "iif_spec",
    NavigationValueFct => "navigation_value_fct",
    NavigationRelClass => "navigation_rel_class",
    OptNavigationRelClass => "opt_navigation_rel_class",
    CastSpec => "cast_spec",
    CastTargetScalar => "cast_target_scalar",
    CastTargetArray => "cast_target_array",
    SimpleCase => "simple_case",
    SearchedCase => "searched_case",
    SimpleWhenClauseList => "simple_when_clause_list",
    SimpleWhenClause => "simple_when_clause",
    WhenOperandList => "when_operand_list",
    SearchedWhenClauseList => "searched_when_clause_list",
    SearchedWhenClause => "searched_when_clause",
    ElseClause => "else_clause",
    OptElseClause => "opt_else_clause",

    // Window functions
    WindowFunction => "window_function",
    WindowFunctionType => "window_function_type",
    NtileFunction => "ntile_function",
    LeadOrLagFunction => "lead_or_lag_function",
    LeadOrLagExtras => "lead_or_lag_extras",
    OptLeadOrLagExtras => "opt_lead_or_lag_extras",
    FirstOrLastValueFunction => "first_or_last_value_function",
    NthValueFunction => "nth_value_function",
    FromFirstOrLast => "from_first_or_last",
    OptFromFirstOrLast => "opt_from_first_or_last",
    NullTreatment => "null_treatment",
    OptNullTreatment => "opt_null_treatment",
    FilterClause => "filter_clause",
    OptFilterClause => "opt_filter_clause",
    WindowSpecification => "window_specification",
    WindowSpecificationDetails => "window_specification_details",
    OptExistingWindowName => "opt_existing_window_name",
    WindowPartitionClause => "window_partition_clause",
    OptWindowPartitionClause => "opt_window_partition_clause",
    WindowPartitionColumnReferenceList => "window_partition_column_reference_list",
    WindowPartitionColumnReference => "window_partition_column_reference",
    CollateClause => "collate_clause",
    OptCollateClause => "opt_collate_clause",
    WindowFrameClause => "window_frame_clause",
    OptWindowFrameClause => "opt_window_frame_clause",
    WindowFrameBetween => "window_frame_between",
    WindowFrameStart => "window_frame_start",
    WindowFramePreceding => "window_frame_preceding",
    WindowFrameBound => "window_frame_bound",
    WindowFrameFollowing => "window_frame_following",
    WindowFrameExclusion => "window_frame_exclusion",
    OptWindowFrameExclusion => "opt_window_frame_exclusion",
}

impl RuleTag {
    /// True for the tags a full-statement parse may return as its root.
    #[must_use]
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::Pragma
                | Self::SelectStatement
                | Self::InsertStatement
                | Self::UpdateStatementSearched
                | Self::DeleteStatementSearched
        )
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
