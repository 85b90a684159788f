use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use gym_data::{Insert, Member, MemberFilter, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                name,
                contact,
                last_paid_at,
                payment_duration_months
            FROM members
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = filter.name.clone() {
            qry.push(" AND name LIKE ").push_bind(format!("%{}%", name));
        }
        if let Some(contact) = filter.contact.clone() {
            qry.push(" AND contact = ").push_bind(contact);
        }
        qry.push(" ORDER BY id");

        let members: Vec<Member> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for Connection {
    type Key = u32;
    async fn retrieve(&self, member_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            id: Some(member_id),
            ..Default::default()
        };
        let mut members = self.query(&filter).await?;
        if members.len() > 1 {
            return Err(QueryError::Ambiguous(members.len()).into());
        }
        let member = members.pop().ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for Connection {
    async fn insert(&self, member: Member) -> Result<Member> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO members (
                    name,
                    contact,
                    last_paid_at,
                    payment_duration_months
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&member.name)
                .push_bind(&member.contact)
                .push_bind(member.last_paid_at)
                .push_bind(member.payment_duration_months);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        log::debug!("inserted member {} ({})", insert.id, member.name);
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Member> for Connection {
    /// Update member
    async fn update(&self, member: Member) -> Result<Member> {
        {
            let mut conn = self.lock().await;
            let result = QueryBuilder::<Sqlite>::new("UPDATE members SET")
                .push(" name = ")
                .push_bind(&member.name)
                .push(", contact = ")
                .push_bind(&member.contact)
                .push(", last_paid_at = ")
                .push_bind(member.last_paid_at)
                .push(", payment_duration_months = ")
                .push_bind(member.payment_duration_months)
                .push(" WHERE id = ")
                .push_bind(member.id)
                .build()
                .execute(&mut *conn)
                .await?;
            if result.rows_affected() == 0 {
                return Err(QueryError::NotFound.into());
            }
        }
        self.retrieve(member.id).await
    }
}
