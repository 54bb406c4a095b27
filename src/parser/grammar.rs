//! Recursive-descent grammar over the shared cursor.
//!
//! Two interchangeable notations feed the same AST: the unicode operator
//! table (`σ π ρ ⋈ ∪ ∩ − × ÷` with `_{…}` subscripts) and the ASCII
//! function-call table (`sigma/pi/rho/JOIN/UNION/INTERSECT/DIFF/CROSS/DIV`).
//! Precedence, lowest to highest: union-like, product-like, unary prefix
//! and primaries; equal precedence is left-associative.

use crate::error::EngineResult;
use crate::parser::ast::Expr;
use crate::parser::cursor::Cursor;
use crate::parser::list::{parse_columns_list, parse_rename_map};

/// Parse a complete expression; leftover input is an error
pub fn parse_expression(source: &str) -> EngineResult<Expr> {
    let mut cursor = Cursor::new(source);
    let expr = parse_union_like(&mut cursor)?;
    if !cursor.at_end() {
        let position = cursor.position();
        return Err(cursor.error(format!(
            "Unexpected trailing input at position {}",
            position + 1
        )));
    }
    Ok(expr)
}

fn parse_union_like(cursor: &mut Cursor) -> EngineResult<Expr> {
    let mut expr = parse_product_like(cursor)?;
    loop {
        if cursor.match_symbol("∪") {
            let right = parse_product_like(cursor)?;
            expr = Expr::Union {
                left: Box::new(expr),
                right: Box::new(right),
            };
            continue;
        }
        if cursor.match_symbol("∩") {
            let right = parse_product_like(cursor)?;
            expr = Expr::Intersection {
                left: Box::new(expr),
                right: Box::new(right),
            };
            continue;
        }
        if cursor.match_symbol("−") {
            let right = parse_product_like(cursor)?;
            expr = Expr::Difference {
                left: Box::new(expr),
                right: Box::new(right),
            };
            continue;
        }
        break;
    }
    Ok(expr)
}

fn parse_product_like(cursor: &mut Cursor) -> EngineResult<Expr> {
    let mut expr = parse_unary(cursor)?;
    loop {
        if cursor.match_symbol("×") {
            let right = parse_unary(cursor)?;
            expr = Expr::Product {
                left: Box::new(expr),
                right: Box::new(right),
            };
            continue;
        }
        if cursor.match_symbol("÷") {
            let right = parse_unary(cursor)?;
            expr = Expr::Division {
                left: Box::new(expr),
                right: Box::new(right),
            };
            continue;
        }
        if cursor.match_symbol("⋈") {
            let condition = cursor.read_subscript("Join condition missing closing brace.")?;
            let right = parse_unary(cursor)?;
            expr = Expr::Join {
                left: Box::new(expr),
                right: Box::new(right),
                condition,
            };
            continue;
        }
        break;
    }
    Ok(expr)
}

fn parse_unary(cursor: &mut Cursor) -> EngineResult<Expr> {
    // unicode prefix forms
    if cursor.match_symbol("σ") {
        let condition = cursor.read_subscript("Selection condition missing closing brace.")?;
        cursor.expect("(", "Selection requires parentheses.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "Selection missing closing parenthesis.")?;
        return Ok(Expr::Selection {
            source: Box::new(source),
            condition,
        });
    }
    if cursor.match_symbol("π") {
        let spec = cursor.read_subscript("Projection missing closing brace.")?;
        cursor.expect("(", "Projection requires parentheses.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "Projection missing closing parenthesis.")?;
        return Ok(Expr::Projection {
            source: Box::new(source),
            columns: parse_columns_list(&spec),
        });
    }
    if cursor.match_symbol("ρ") {
        let spec_offset = cursor.position();
        let spec = cursor.read_subscript("Rename missing closing brace.")?;
        cursor.expect("(", "Rename requires parentheses.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "Rename missing closing parenthesis.")?;
        return Ok(Expr::Rename {
            source: Box::new(source),
            renames: parse_rename_map(&spec, spec_offset)?,
        });
    }

    // ASCII function-call forms
    if cursor.match_word("sigma") {
        cursor.expect("(", "sigma requires parentheses.")?;
        let condition = cursor.read_until_comma().trim().to_string();
        cursor.expect(",", "sigma expects a relation argument.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "sigma call missing closing parenthesis.")?;
        return Ok(Expr::Selection {
            source: Box::new(source),
            condition,
        });
    }
    if cursor.match_word("pi") {
        cursor.expect("(", "pi requires parentheses.")?;
        let spec = cursor.read_until_comma();
        cursor.expect(",", "pi expects relation argument after column list.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "pi call missing closing parenthesis.")?;
        return Ok(Expr::Projection {
            source: Box::new(source),
            columns: parse_columns_list(&spec),
        });
    }
    if cursor.match_word("rho") {
        cursor.expect("(", "rho requires parentheses.")?;
        let spec_offset = cursor.position();
        let spec = cursor.read_until_comma();
        cursor.expect(",", "rho expects relation argument after mapping.")?;
        let source = parse_union_like(cursor)?;
        cursor.expect(")", "rho call missing closing parenthesis.")?;
        return Ok(Expr::Rename {
            source: Box::new(source),
            renames: parse_rename_map(&spec, spec_offset)?,
        });
    }
    if cursor.match_word("JOIN") {
        cursor.expect("(", "JOIN requires parentheses.")?;
        let left = parse_union_like(cursor)?;
        cursor.expect(",", "JOIN expects right relation.")?;
        let right = parse_union_like(cursor)?;
        cursor.expect(",", "JOIN expects ON condition.")?;
        let condition = cursor.read_until_comma().trim().to_string();
        cursor.expect(")", "JOIN call missing closing parenthesis.")?;
        return Ok(Expr::Join {
            left: Box::new(left),
            right: Box::new(right),
            condition,
        });
    }
    if let Some(expr) = parse_binary_call(cursor)? {
        return Ok(expr);
    }

    // parenthesized subexpression
    if cursor.match_symbol("(") {
        let expr = parse_union_like(cursor)?;
        cursor.expect(")", "Unclosed parenthesis.")?;
        return Ok(expr);
    }

    // bare or quoted relation name
    let name = cursor.read_identifier()?;
    Ok(Expr::Relation { name })
}

/// The two-argument ASCII calls share one shape
fn parse_binary_call(cursor: &mut Cursor) -> EngineResult<Option<Expr>> {
    type Build = fn(Box<Expr>, Box<Expr>) -> Expr;
    const CALLS: [(&str, Build); 4] = [
        ("UNION", |left, right| Expr::Union { left, right }),
        ("INTERSECT", |left, right| Expr::Intersection { left, right }),
        ("DIFF", |left, right| Expr::Difference { left, right }),
        ("CROSS", |left, right| Expr::Product { left, right }),
    ];

    for (keyword, build) in CALLS {
        if cursor.match_word(keyword) {
            cursor.expect("(", &format!("{} requires parentheses.", keyword))?;
            let left = parse_union_like(cursor)?;
            cursor.expect(",", &format!("{} expects right relation.", keyword))?;
            let right = parse_union_like(cursor)?;
            cursor.expect(")", &format!("{} missing closing parenthesis.", keyword))?;
            return Ok(Some(build(Box::new(left), Box::new(right))));
        }
    }
    if cursor.match_word("DIV") {
        cursor.expect("(", "DIV requires parentheses.")?;
        let left = parse_union_like(cursor)?;
        cursor.expect(",", "DIV expects right relation.")?;
        let right = parse_union_like(cursor)?;
        cursor.expect(")", "DIV missing closing parenthesis.")?;
        return Ok(Some(Expr::Division {
            left: Box::new(left),
            right: Box::new(right),
        }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::ColumnSpec;
    use crate::error::EngineError;

    #[test]
    fn test_unicode_selection_projection() -> EngineResult<()> {
        let expr = parse_expression("π_{EmpID,Name}(σ_{Salary > 3000}(Employee))")?;
        match expr {
            Expr::Projection { source, columns } => {
                assert_eq!(
                    columns,
                    vec![ColumnSpec::new("EmpID"), ColumnSpec::new("Name")]
                );
                match *source {
                    Expr::Selection {
                        source, condition, ..
                    } => {
                        assert_eq!(condition, "Salary > 3000");
                        assert_eq!(
                            *source,
                            Expr::Relation {
                                name: "Employee".to_string()
                            }
                        );
                    }
                    other => panic!("expected selection, got {:?}", other),
                }
            }
            other => panic!("expected projection, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_ascii_join_call() -> EngineResult<()> {
        let expr =
            parse_expression("JOIN(Employee, Department, Employee.DeptID = Department.DeptID)")?;
        match expr {
            Expr::Join {
                left,
                right,
                condition,
            } => {
                assert_eq!(
                    *left,
                    Expr::Relation {
                        name: "Employee".to_string()
                    }
                );
                assert_eq!(
                    *right,
                    Expr::Relation {
                        name: "Department".to_string()
                    }
                );
                assert_eq!(condition, "Employee.DeptID = Department.DeptID");
            }
            other => panic!("expected join, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_infix_join_with_subscript() -> EngineResult<()> {
        let expr = parse_expression("Employee ⋈_{Employee.DeptID=Department.DeptID} Department")?;
        match expr {
            Expr::Join { condition, .. } => {
                assert_eq!(condition, "Employee.DeptID=Department.DeptID");
            }
            other => panic!("expected join, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_precedence_product_binds_tighter_than_union() -> EngineResult<()> {
        // A ∪ B × C  parses as  A ∪ (B × C)
        let expr = parse_expression("A ∪ B × C")?;
        match expr {
            Expr::Union { right, .. } => assert!(matches!(*right, Expr::Product { .. })),
            other => panic!("expected union at root, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_left_associativity() -> EngineResult<()> {
        // A − B − C  parses as  (A − B) − C
        let expr = parse_expression("A − B − C")?;
        match expr {
            Expr::Difference { left, right } => {
                assert!(matches!(*left, Expr::Difference { .. }));
                assert_eq!(
                    *right,
                    Expr::Relation {
                        name: "C".to_string()
                    }
                );
            }
            other => panic!("expected difference at root, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_ascii_calls_are_case_insensitive() -> EngineResult<()> {
        assert!(matches!(
            parse_expression("union(A, B)")?,
            Expr::Union { .. }
        ));
        assert!(matches!(
            parse_expression("SIGMA(Salary > 100, Employee)")?,
            Expr::Selection { .. }
        ));
        assert!(matches!(
            parse_expression("div(Assignment, Projects)")?,
            Expr::Division { .. }
        ));
        Ok(())
    }

    #[test]
    fn test_rename_with_separators() -> EngineResult<()> {
        let expr = parse_expression("ρ_{DeptID -> ID, DeptName: Label}(Department)")?;
        match expr {
            Expr::Rename { renames, .. } => {
                assert_eq!(renames.get("DeptID"), Some(&"ID".to_string()));
                assert_eq!(renames.get("DeptName"), Some(&"Label".to_string()));
            }
            other => panic!("expected rename, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_quoted_relation_name() -> EngineResult<()> {
        let expr = parse_expression("σ_{Salary > 0}(\"My Table\")")?;
        match expr {
            Expr::Selection { source, .. } => {
                assert_eq!(
                    *source,
                    Expr::Relation {
                        name: "My Table".to_string()
                    }
                );
            }
            other => panic!("expected selection, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_trailing_input_rejected() {
        let err = parse_expression("Employee extra").unwrap_err();
        match err {
            EngineError::Parse { message, .. } => {
                assert!(message.contains("trailing input"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_expression("σ_{x > 1}Employee").unwrap_err();
        match err {
            EngineError::Parse { offset, message } => {
                assert_eq!(message, "Selection requires parentheses.");
                assert!(offset > 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_parenthesis() {
        assert!(parse_expression("(A ∪ B").is_err());
    }

    #[test]
    fn test_nested_mixed_notations() -> EngineResult<()> {
        let expr = parse_expression("pi(EmpID, σ_{DeptID = 1}(Employee))")?;
        match expr {
            Expr::Projection { source, .. } => {
                assert!(matches!(*source, Expr::Selection { .. }));
            }
            other => panic!("expected projection, got {:?}", other),
        }
        Ok(())
    }
}
