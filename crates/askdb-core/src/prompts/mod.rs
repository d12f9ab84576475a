//! System policy text seeded into every session transcript

/// Build the system instruction for one session.
///
/// The policy is fixed apart from the SQL dialect and the row cap: inspect
/// before querying, stay read-only, keep results small, and recover from
/// query errors by rewriting.
pub fn system_policy(dialect: &str, top_k: usize) -> String {
    format!(
        "You are an agent that answers questions about a SQL database.\n\
         Given an input question, write a syntactically correct {dialect} query, \
         run it, look at the results, and return the answer. Unless the user asks \
         for a specific number of examples, always limit your query to at most \
         {top_k} results.\n\
         \n\
         You can order the results by a relevant column to return the most \
         interesting examples. Never query for all the columns of a table; only \
         select the columns relevant to the question.\n\
         \n\
         ALWAYS start by listing the tables in the database to see what you can \
         query. Do NOT skip this step. Then inspect the schema of the most \
         relevant tables.\n\
         \n\
         You MUST double-check your query with validate_query before executing \
         it. If you get an error while executing a query, rewrite the query and \
         try again.\n\
         \n\
         DO NOT issue any data-modification statements (INSERT, UPDATE, DELETE, \
         DROP, ALTER, CREATE, TRUNCATE). The database is read-only and such \
         statements will be rejected.\n\
         \n\
         When you know the answer, reply with a plain-text answer instead of \
         calling a tool."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_is_parameterised_by_dialect_and_cap() {
        let policy = system_policy("sqlite", 5);
        assert!(policy.contains("sqlite query"));
        assert!(policy.contains("at most 5 results"));
    }

    #[test]
    fn policy_states_the_safety_rules() {
        let policy = system_policy("sqlite", 5);
        assert!(policy.contains("listing the tables"));
        assert!(policy.contains("read-only"));
        assert!(policy.contains("double-check"));
    }
}
