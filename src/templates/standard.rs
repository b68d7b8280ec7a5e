use super::{Complexity, RuleTemplate, TemplateCategory};

macro_rules! templates {
    ( $( {
        id: $id:expr,
        name: $name:expr,
        category: $cat:ident,
        complexity: $cx:ident,
        description: $desc:expr,
        expression: $expr:expr,
        on_success: $ok:expr,
        on_failure: $fail:expr $(,)?
    } ),* $(,)? ) => {
        pub(super) fn standard_templates() -> Vec<RuleTemplate> {
            vec![
                $( RuleTemplate {
                    id: $id.to_string(),
                    name: $name.to_string(),
                    description: $desc.to_string(),
                    category: TemplateCategory::$cat,
                    expression: $expr.to_string(),
                    on_success: $ok.to_string(),
                    on_failure: $fail.to_string(),
                    complexity: Complexity::$cx,
                }, )*
            ]
        }
    };
}

templates! {
    {
        id: "basic-commission",
        name: "Basic Commission",
        category: Commission,
        complexity: Simple,
        description: "Pays the period commission rate on every positive sale.",
        expression: "sale.Amount > 0",
        on_success: "sale.Amount * context.CommissionRate",
        on_failure: "0",
    },
    {
        id: "target-achievement",
        name: "Target Achievement",
        category: Quota,
        complexity: Simple,
        description: "Releases a share of the bonus pool once the rep's sales reach the period target.",
        expression: "userSales.sum(s => s.SaleAmount) >= context.Target",
        on_success: "context.BonusPool * 0.1",
        on_failure: "0",
    },
    {
        id: "new-customer-bonus",
        name: "New Customer Bonus",
        category: Bonus,
        complexity: Simple,
        description: "Five percent extra on sales to new customers, capped at 500.",
        expression: "customer.IsNew === true",
        on_success: "Math.min(sale.Amount * 0.05, 500)",
        on_failure: "0",
    },
    {
        id: "tiered-commission",
        name: "Tiered Commission",
        category: Commission,
        complexity: Intermediate,
        description: "Commission rate steps up with deal size.",
        expression: "sale.Amount >= 1000",
        on_success: "sale.Amount >= 10000 ? sale.Amount * 0.08 : sale.Amount >= 5000 ? sale.Amount * 0.06 : sale.Amount * 0.04",
        on_failure: "sale.Amount * 0.02",
    },
    {
        id: "high-margin-bonus",
        name: "High Margin Bonus",
        category: Product,
        complexity: Intermediate,
        description: "Rewards high-margin sales that were not heavily discounted.",
        expression: "sale.Margin > 0.3 && sale.Discount <= 0.1",
        on_success: "sale.Amount * sale.Margin * 0.05",
        on_failure: "0",
    },
    {
        id: "promoted-product",
        name: "Promoted Product Spiff",
        category: Product,
        complexity: Intermediate,
        description: "A flat amount per unit when the sold product is on promotion.",
        expression: "products.any(p => p.Id == sale.ProductId && p.IsPromoted)",
        on_success: "sale.Quantity * 25",
        on_failure: "0",
    },
    {
        id: "tenure-bonus",
        name: "Tenure Bonus",
        category: Bonus,
        complexity: Intermediate,
        description: "One percent per year of service, up to five years, for reps past their first year.",
        expression: "Date.daysBetween(user.HireDate, context.Today) >= 365",
        on_success: "Math.round(sale.Amount * 0.01 * Math.min(Math.floor(Date.daysBetween(user.HireDate, context.Today) / 365), 5))",
        on_failure: "0",
    },
    {
        id: "manager-override",
        name: "Manager Override",
        category: Team,
        complexity: Intermediate,
        description: "Managers earn a small override on everything their team achieved.",
        expression: "user.Role == 'manager' && teamMembers.count() > 0",
        on_success: "teamMembers.sum(m => m.Achieved) * 0.01",
        on_failure: "0",
    },
    {
        id: "quarterly-accelerator",
        name: "Q4 Accelerator",
        category: Quota,
        complexity: Advanced,
        description: "Extra bonus when fourth-quarter sales beat the target by twenty percent.",
        expression: "context.Quarter === 4 && userSales.where(s => Date.quarter(s.CreatedDate) === 4).sum(s => s.SaleAmount) > context.Target * 1.2",
        on_success: "context.BonusPool * 0.15",
        on_failure: "0",
    },
    {
        id: "team-performance",
        name: "Team Performance Pool",
        category: Team,
        complexity: Advanced,
        description: "Splits the bonus pool evenly when every team member reaches eighty percent of target.",
        expression: "teamMembers.count() > 0 && teamMembers.all(m => m.Achieved >= m.Target * 0.8)",
        on_success: "context.BonusPool / teamMembers.count()",
        on_failure: "0",
    },
    {
        id: "above-average-deals",
        name: "Above Average Deals",
        category: Quota,
        complexity: Advanced,
        description: "Rewards reps whose average deal is larger than the company average.",
        expression: "userSales.count() > 0 && userSales.average(s => s.SaleAmount) > allSales.average(s => s.SaleAmount)",
        on_success: "(userSales.average(s => s.SaleAmount) - allSales.average(s => s.SaleAmount)) * 0.5",
        on_failure: "0",
    },
    {
        id: "regional-top-seller",
        name: "Regional Top Seller",
        category: Commission,
        complexity: Expert,
        description: "Doubles commission for the rep with the highest sales volume in the sale's region.",
        expression: "allSales.where(s => s.Region == sale.Region).groupBy(s => s.CreatedBy).orderByDescending(g => g.Items.sum(s => s.SaleAmount)).first().Key == user.Id",
        on_success: "sale.Amount * context.CommissionRate * 2",
        on_failure: "sale.Amount * context.CommissionRate",
    },
    {
        id: "large-deal-streak",
        name: "Large Deal Streak",
        category: Bonus,
        complexity: Expert,
        description: "Bonus when the rep's five most recent deals were all at least 1000.",
        expression: "userSales.count() >= 5 && userSales.orderByDescending(s => s.CreatedDate).take(5).all(s => s.SaleAmount >= 1000)",
        on_success: "userSales.orderByDescending(s => s.CreatedDate).take(5).average(s => s.SaleAmount) * 0.02",
        on_failure: "0",
    },
    {
        id: "category-diversity",
        name: "Category Diversity",
        category: Product,
        complexity: Expert,
        description: "Flat bonus for closing deals in at least three product categories.",
        expression: "userSales.where(s => s.Status == 'closed').groupBy(s => s.CategoryId).count() >= 3",
        on_success: "250",
        on_failure: "0",
    },
}
