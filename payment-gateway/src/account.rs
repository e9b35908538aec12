use anyhow::Result;
use async_trait::async_trait;

/// A named merchant configuration for one provider.
pub trait GatewayAccount: Clone + Send + Sync {
    fn name(&self) -> &str;
}

/// Accounts of one provider, in registration order. The first one is the default.
#[derive(Debug, Clone)]
pub struct GatewayAccountCollection<A> {
    accounts: Vec<A>,
}

impl<A: GatewayAccount> GatewayAccountCollection<A> {
    pub fn new() -> Self {
        Self { accounts: Vec::new() }
    }

    /// Adds an account; a later account with the same name replaces the earlier one.
    pub fn add(&mut self, account: A) {
        match self.accounts.iter_mut().find(|a| a.name() == account.name()) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    pub fn default_account(&self) -> Option<&A> {
        self.accounts.first()
    }

    /// Empty name selects the default account; anything else must match exactly.
    pub fn get_or_default(&self, name: &str) -> Option<&A> {
        if name.trim().is_empty() {
            return self.default_account();
        }
        self.accounts.iter().find(|a| a.name() == name)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl<A: GatewayAccount> Default for GatewayAccountCollection<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: GatewayAccount> FromIterator<A> for GatewayAccountCollection<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut collection = Self::new();
        for account in iter {
            collection.add(account);
        }
        collection
    }
}

#[async_trait]
pub trait AccountProvider<A: GatewayAccount>: Send + Sync {
    async fn load_accounts(&self) -> Result<GatewayAccountCollection<A>>;
}

/// Serves a fixed set of accounts configured at start-up.
pub struct InMemoryAccountProvider<A> {
    accounts: GatewayAccountCollection<A>,
}

impl<A: GatewayAccount> InMemoryAccountProvider<A> {
    pub fn new(accounts: impl IntoIterator<Item = A>) -> Self {
        Self { accounts: accounts.into_iter().collect() }
    }
}

#[async_trait]
impl<A: GatewayAccount + 'static> AccountProvider<A> for InMemoryAccountProvider<A> {
    async fn load_accounts(&self) -> Result<GatewayAccountCollection<A>> {
        Ok(self.accounts.clone())
    }
}
