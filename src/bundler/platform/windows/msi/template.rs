//! WiX source template.
//!
//! Rendered with XML escaping. One component, file and start menu shortcut
//! per application.

pub const WXS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Wix xmlns="http://schemas.microsoft.com/wix/2006/wi">
  <Product Id="{{product_code}}" Name="{{product_name}}" Language="{{lcid}}" Codepage="{{codepage}}" Version="{{version}}" Manufacturer="{{manufacturer}}" UpgradeCode="{{upgrade_code}}">
    <Package InstallerVersion="500" Compressed="yes" InstallScope="{{install_scope}}" Platform="{{platform}}" Languages="{{lcid}}" SummaryCodepage="{{codepage}}"{{#if description}} Description="{{description}}"{{/if}} />
    <MajorUpgrade DowngradeErrorMessage="A newer version of [ProductName] is already installed." />
    <MediaTemplate EmbedCab="yes" />
{{#if icon}}
    <Icon Id="ProductIcon" SourceFile="{{icon}}" />
    <Property Id="ARPPRODUCTICON" Value="ProductIcon" />
{{/if}}
    <Directory Id="TARGETDIR" Name="SourceDir">
      <Directory Id="{{root_folder}}">
        <Directory Id="INSTALLDIR" Name="{{install_dir_name}}">
{{#each applications}}
          <Component Id="{{this.component_id}}" Guid="{{this.guid}}">
            <File Id="{{this.file_id}}" Source="{{this.source}}" Name="{{this.file_name}}" KeyPath="yes">
              <Shortcut Id="{{this.shortcut_id}}" Directory="ProgramMenuDir" Name="{{this.display_name}}" WorkingDirectory="INSTALLDIR" Advertise="yes"{{#if ../icon}} Icon="ProductIcon"{{/if}}{{#if this.arguments}} Arguments="{{this.arguments}}"{{/if}}{{#if this.description}} Description="{{this.description}}"{{/if}} />
            </File>
{{#each this.extra_files}}
            <File Id="{{this.id}}" Source="{{this.source}}" Name="{{this.name}}" />
{{/each}}
          </Component>
{{/each}}
        </Directory>
      </Directory>
      <Directory Id="ProgramMenuFolder">
        <Directory Id="ProgramMenuDir" Name="{{product_name}}">
          <Component Id="ProgramMenuDir" Guid="{{menu_guid}}">
            <RemoveFolder Id="ProgramMenuDir" On="uninstall" />
            <RegistryValue Root="HKCU" Key="{{registry_key}}" Type="string" Value="" KeyPath="yes" />
          </Component>
        </Directory>
      </Directory>
    </Directory>
    <Feature Id="Complete" Level="1">
{{#each applications}}
      <ComponentRef Id="{{this.component_id}}" />
{{/each}}
      <ComponentRef Id="ProgramMenuDir" />
    </Feature>
    <Property Id="WIXUI_INSTALLDIR" Value="INSTALLDIR" />
    <UIRef Id="WixUI_InstallDir" />
  </Product>
</Wix>
"#;
